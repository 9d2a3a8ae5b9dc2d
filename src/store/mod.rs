//! Document store seam.
//!
//! Every persisted record (applicants, the reference directory, admin users)
//! lives in a named collection as a JSON object keyed by an opaque id. Reads
//! are by id or by a conjunction of field equality filters; writes are
//! create, full/merge set, and partial update.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

pub type Fields = serde_json::Map<String, JsonValue>;

pub const APPLICANTS: &str = "applicants";
pub const REFERENCES: &str = "references";
pub const ADMIN_USERS: &str = "adminUsers";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{id} does not exist")]
    NotFound { collection: String, id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Decodes the document into a model, exposing the store id as `id`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), JsonValue::String(self.id));
        Ok(serde_json::from_value(JsonValue::Object(fields))?)
    }

    pub fn matches(&self, filters: &[Filter]) -> bool {
        filters
            .iter()
            .all(|f| self.fields.get(&f.field) == Some(&f.value))
    }
}

/// Serialises a model into document fields. The model must serialise to a
/// JSON object.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected object, found {}",
            other
        )))),
    }
}

/// Field equality predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: JsonValue,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and returns its generated id.
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Writes the document under `id`. With `merge` the given fields are laid
    /// over the existing ones, otherwise the document is replaced.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Overwrites only the given fields. Fails with `NotFound` when the
    /// document does not exist.
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Documents matching every filter, in insertion order.
    async fn query_documents(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Named {
        id: String,
        name: String,
    }

    fn doc(id: &str, value: JsonValue) -> Document {
        Document {
            id: id.to_string(),
            fields: value.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn decode_injects_id() {
        let named: Named = doc("abc", json!({ "name": "Asha" })).decode().unwrap();
        assert_eq!(named.id, "abc");
        assert_eq!(named.name, "Asha");
    }

    #[test]
    fn matches_requires_every_filter() {
        let d = doc("1", json!({ "type": "reference", "name": "Asha" }));
        assert!(d.matches(&[]));
        assert!(d.matches(&[Filter::eq("type", "reference")]));
        assert!(!d.matches(&[Filter::eq("type", "reference"), Filter::eq("name", "Ravi")]));
        assert!(!d.matches(&[Filter::eq("missing", "x")]));
    }
}
