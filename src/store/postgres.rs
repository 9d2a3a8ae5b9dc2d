use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{types::Json, FromRow, PgPool};

use super::{Document, DocumentStore, Fields, Filter, StoreError};
use crate::utils::token::generate_document_id;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    fields: Json<JsonValue>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let fields = match row.fields.0 {
            JsonValue::Object(map) => map,
            other => {
                return Err(StoreError::Serialization(serde::de::Error::custom(format!(
                    "expected object, found {}",
                    other
                ))))
            }
        };
        Ok(Document { id: row.id, fields })
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Equality filters folded into one JSONB containment document.
fn containment(filters: &[Filter]) -> JsonValue {
    let mut map = Fields::new();
    for f in filters {
        map.insert(f.field.clone(), f.value.clone());
    }
    JsonValue::Object(map)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = generate_document_id();
        sqlx::query("INSERT INTO documents (collection, id, fields) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(JsonValue::Object(fields)))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, fields FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Document::try_from).transpose()
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        merge: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, fields)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE
            SET fields = CASE WHEN $4 THEN documents.fields || EXCLUDED.fields ELSE EXCLUDED.fields END,
                updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(JsonValue::Object(fields)))
        .bind(merge)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET fields = fields || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(JsonValue::Object(fields)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn query_documents(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1 AND fields @> $2
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .bind(Json(containment(filters)))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Document::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn containment_folds_filters() {
        let doc = containment(&[Filter::eq("type", "reference"), Filter::eq("target", 10)]);
        assert_eq!(doc, json!({ "type": "reference", "target": 10 }));
        assert_eq!(containment(&[]), json!({}));
    }
}
