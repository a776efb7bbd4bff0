//! Repository Module
//!
//! Entity store for lists and members. Every declared attribute maps to a
//! column of the same name holding JSON text, so the SQL is derived from the
//! attribute declarations instead of being spelled out per field.

pub mod list;
pub mod member;

pub use list::{ListFilter, ListRepository};
pub use member::{MemberFilter, MemberRepository};

use serde_json::{Map, Value};
use shared::models::MailChimpEntity;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for entity persistence
#[allow(async_fn_in_trait)]
pub trait Repository<E: MailChimpEntity> {
    type Filter;

    /// Insert a new entity, assigning its local id
    async fn create(&self, entity: &mut E) -> RepoResult<()>;
    async fn find(&self, id: &str) -> RepoResult<Option<E>>;
    async fn find_one_by(&self, filter: &Self::Filter) -> RepoResult<Option<E>>;
    /// Write every column of an already persisted entity
    async fn update(&self, entity: &E) -> RepoResult<()>;
    async fn delete(&self, entity: &E) -> RepoResult<bool>;

    /// Create on first save, update afterwards
    async fn save(&self, entity: &mut E) -> RepoResult<()> {
        if entity.id().is_some() {
            self.update(entity).await
        } else {
            self.create(entity).await
        }
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `a, b, c` column list
pub(crate) fn columns(fields: &[&str]) -> String {
    fields.join(", ")
}

/// Push attribute values as JSON binds, absent attributes as NULL
pub(crate) fn push_attribute_values<'v>(
    builder: &mut QueryBuilder<'_, Sqlite>,
    values: impl Iterator<Item = (&'static str, Option<&'v Value>)>,
) {
    for (_, value) in values {
        builder.push(", ").push_bind(value.cloned().map(Json));
    }
}

/// Push `col = ?` assignments for every attribute
pub(crate) fn push_attribute_assignments<'v>(
    builder: &mut QueryBuilder<'_, Sqlite>,
    values: impl Iterator<Item = (&'static str, Option<&'v Value>)>,
) {
    for (field, value) in values {
        builder
            .push(", ")
            .push(field)
            .push(" = ")
            .push_bind(value.cloned().map(Json));
    }
}

/// Read the attribute columns of a row back into a map (NULL -> `null`)
pub(crate) fn read_attributes(row: &SqliteRow, fields: &[&str]) -> RepoResult<Map<String, Value>> {
    let mut map = Map::with_capacity(fields.len());
    for field in fields {
        let value: Option<Json<Value>> = row.try_get(*field)?;
        map.insert((*field).to_string(), value.map(|Json(v)| v).unwrap_or(Value::Null));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns() {
        assert_eq!(columns(&["a", "b"]), "a, b");
        assert_eq!(columns(&[]), "");
    }

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }
}
