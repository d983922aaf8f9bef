//! Domain service for catalog operations.
//!
//! Handlers talk to [`CatalogService`] rather than the store, so id parsing,
//! not-found translation and error mapping live in one place.

use crate::domain::EntryId;
use crate::models::entry::{EntryFilter, EntryRow, EntryUpdate, NewEntry, WriteAck};
use crate::models::publisher::{Publisher, PublisherFilter};
use serde::Serialize;
use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid fields: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Carries the reference as the caller gave it.
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists entries matching every supplied filter.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] on database failures.
    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<EntryRow>, CatalogError>;

    /// Fetches one entry; `Ok(None)` when no joined row exists.
    async fn get_entry(&self, id: EntryId) -> Result<Option<EntryRow>, CatalogError>;

    /// Inserts a validated entry.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] if the publisher does not exist
    /// - Returns [`CatalogError::Storage`] on database failures
    async fn create_entry(&self, entry: &NewEntry) -> Result<WriteAck, CatalogError>;

    /// Overwrites an entry's editable fields.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no row was affected
    /// - Returns [`CatalogError::Storage`] on database failures
    async fn update_entry(
        &self,
        id: EntryId,
        update: &EntryUpdate,
    ) -> Result<WriteAck, CatalogError>;

    /// Deletes an entry by its raw id.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::InvalidArgument`] for a missing or non-numeric id,
    ///   before any storage access
    /// - Returns [`CatalogError::NotFound`] if no row was affected, or without
    ///   touching storage when the number cannot be an id
    /// - Returns [`CatalogError::Storage`] on database failures
    async fn delete_entry(&self, raw_id: Option<&str>) -> Result<WriteAck, CatalogError>;

    async fn list_publishers(
        &self,
        filter: &PublisherFilter,
    ) -> Result<Vec<Publisher>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_display() {
        let err = CatalogError::NotFound(EntryId::new(42).to_string());
        assert_eq!(err.to_string(), "Entry not found: 42");

        let err = CatalogError::Validation(vec![
            FieldError::new("date", "Please enter date in YYYY-MM-DD format."),
            FieldError::new("stars", "Please enter a star score between 1 and 5."),
        ]);
        assert_eq!(err.to_string(), "Invalid fields: date, stars");
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let err: CatalogError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, CatalogError::Storage(msg) if msg.contains("boom")));
    }
}
