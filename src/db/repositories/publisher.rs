use crate::db::query::search_key;
use crate::domain::PublisherId;
use crate::entities::{prelude::*, publishers};
use crate::models::publisher::PublisherFilter;
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::debug;

pub struct PublisherRepository {
    conn: DatabaseConnection,
}

impl PublisherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, filter: &PublisherFilter) -> Result<Vec<publishers::Model>> {
        let mut query = Publishers::find();

        if let Some(name) = filter.name.as_deref().filter(|n| !n.trim().is_empty()) {
            debug!(name = %name, "Filtering publishers by name");
            query = query.filter(publishers::Column::NameFolded.contains(search_key(name)));
        }

        Ok(query.all(&self.conn).await?)
    }

    pub async fn exists(&self, id: PublisherId) -> Result<bool> {
        let found = Publishers::find_by_id(id.value()).one(&self.conn).await?;
        Ok(found.is_some())
    }
}
