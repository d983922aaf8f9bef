//! `SeaORM` implementation of the [`CatalogService`] trait.

use crate::db::{EntryQuery, Store};
use crate::domain::{EntryId, EntryRef};
use crate::models::entry::{EntryFilter, EntryRow, EntryUpdate, NewEntry, WriteAck};
use crate::models::publisher::{Publisher, PublisherFilter};
use crate::services::catalog_service::{CatalogError, CatalogService, FieldError};
use tracing::warn;

pub const PUBLISHER_ID_MESSAGE: &str = "Please enter a valid publisher ID.";

pub struct SeaOrmCatalogService {
    store: Store,
    default_limit: u64,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, default_limit: u64) -> Self {
        Self {
            store,
            default_limit,
        }
    }
}

#[async_trait::async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<EntryRow>, CatalogError> {
        let query = EntryQuery::from_filter(filter, self.default_limit);
        Ok(self.store.list_entries(&query).await?)
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<EntryRow>, CatalogError> {
        Ok(self.store.get_entry(id).await?)
    }

    async fn create_entry(&self, entry: &NewEntry) -> Result<WriteAck, CatalogError> {
        // reads inner-join on the publisher, so an unknown one would hide the row
        if !self.store.publisher_exists(entry.publisher_id).await? {
            warn!(publisher_id = %entry.publisher_id, "Rejected entry for unknown publisher");
            return Err(CatalogError::Validation(vec![FieldError::new(
                "publisher_id",
                PUBLISHER_ID_MESSAGE,
            )]));
        }

        Ok(self.store.create_entry(entry).await?)
    }

    async fn update_entry(
        &self,
        id: EntryId,
        update: &EntryUpdate,
    ) -> Result<WriteAck, CatalogError> {
        let ack = self.store.update_entry(id, update).await?;
        if ack.is_noop() {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(ack)
    }

    async fn delete_entry(&self, raw_id: Option<&str>) -> Result<WriteAck, CatalogError> {
        let id = match EntryRef::parse(raw_id) {
            Some(EntryRef::Id(id)) => id,
            Some(EntryRef::Unmatchable(raw)) => return Err(CatalogError::NotFound(raw)),
            None => {
                return Err(CatalogError::InvalidArgument(format!(
                    "Invalid ID: {}",
                    raw_id.unwrap_or("<missing>")
                )));
            }
        };

        let ack = self.store.delete_entry(id).await?;
        if ack.is_noop() {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(ack)
    }

    async fn list_publishers(
        &self,
        filter: &PublisherFilter,
    ) -> Result<Vec<Publisher>, CatalogError> {
        Ok(self.store.list_publishers(filter).await?)
    }
}
