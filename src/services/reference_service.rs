use std::sync::Arc;

use crate::error::Result;
use crate::models::reference::{Reference, REFERENCE_KIND};
use crate::store::{to_fields, DocumentStore, Filter, REFERENCES};

/// Read access to the reference directory, a collection shared with other
/// record kinds and told apart by its `type` field.
#[derive(Clone)]
pub struct ReferenceService {
    store: Arc<dyn DocumentStore>,
}

impl ReferenceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_references(&self) -> Result<Vec<Reference>> {
        let docs = self
            .store
            .query_documents(REFERENCES, &[Filter::eq("type", REFERENCE_KIND)])
            .await?;
        let references = docs
            .into_iter()
            .map(|d| d.decode::<Reference>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(references)
    }

    /// Entry keyed by the partner's uid, regardless of its `type`.
    pub async fn get_reference(&self, id: &str) -> Result<Option<Reference>> {
        match self.store.get_document(REFERENCES, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// First reference whose display name equals `name` exactly.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Reference>> {
        let references = self.list_references().await?;
        Ok(references.into_iter().find(|r| r.name == name))
    }

    /// Writes a directory entry under `reference.id`, replacing any previous one.
    pub async fn put_reference(&self, reference: &Reference) -> Result<()> {
        let mut fields = to_fields(reference)?;
        fields.remove("id");
        self.store
            .set_document(REFERENCES, &reference.id, fields, false)
            .await?;
        tracing::info!(reference_id = %reference.id, "reference directory entry written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;

    fn reference(id: &str, name: &str, kind: &str) -> Reference {
        Reference {
            id: id.into(),
            name: name.into(),
            email: format!("{}@example.com", id),
            phone: String::new(),
            target: Some(10.0),
            kind: kind.into(),
        }
    }

    async fn seeded() -> ReferenceService {
        let service = ReferenceService::new(Arc::new(MemoryDocumentStore::new()));
        service.put_reference(&reference("ref_42", "Asha", "reference")).await.unwrap();
        service.put_reference(&reference("ref_7", "Ravi", "reference")).await.unwrap();
        service.put_reference(&reference("ops_1", "Ops Desk", "staff")).await.unwrap();
        service
    }

    #[tokio::test]
    async fn list_skips_other_record_kinds() {
        let service = seeded().await;
        let names: Vec<_> = service
            .list_references()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Asha", "Ravi"]);
    }

    #[tokio::test]
    async fn find_by_name_resolves_id() {
        let service = seeded().await;
        let found = service.find_by_name("Asha").await.unwrap().unwrap();
        assert_eq!(found.id, "ref_42");
        assert!(service.find_by_name("Ops Desk").await.unwrap().is_none());
        assert!(service.find_by_name("asha").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_reference_by_uid() {
        let service = seeded().await;
        let found = service.get_reference("ref_7").await.unwrap().unwrap();
        assert_eq!(found.name, "Ravi");
        assert_eq!(found.target, Some(10.0));
        assert!(service.get_reference("missing").await.unwrap().is_none());
    }
}
