use crate::domain::{EntryId, PublisherId};
use crate::models::entry::{EntryRow, EntryUpdate, NewEntry, WriteAck};
use crate::models::publisher::{Publisher, PublisherFilter};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

pub mod migrator;
pub mod query;
pub mod repositories;

pub use query::{EntryQuery, SortColumn};

/// Handle to the catalog database.
///
/// The connection is opened on first use and then shared by every clone of
/// the store. Initialisation runs once even when several requests arrive
/// before the database is ready; the others wait for the same connection.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    db_url: String,
    conn: OnceCell<DatabaseConnection>,
}

impl Store {
    #[must_use]
    pub fn new(db_url: &str) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                db_url: db_url.to_string(),
                conn: OnceCell::new(),
            }),
        }
    }

    /// Returns the shared connection, opening it and applying migrations on
    /// the first call.
    pub async fn connection(&self) -> Result<&DatabaseConnection> {
        self.inner
            .conn
            .get_or_try_init(|| Self::connect(&self.inner.db_url))
            .await
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.conn.initialized()
    }

    async fn connect(db_url: &str) -> Result<DatabaseConnection> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        // a single connection, never a pool
        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to {db_url}"))?;

        migrator::Migrator::up(&conn, None).await?;

        info!("Database connected & migrations applied");

        Ok(conn)
    }

    pub async fn ping(&self) -> Result<()> {
        let conn = self.connection().await?;
        let backend = conn.get_database_backend();
        conn.query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    async fn entry_repo(&self) -> Result<repositories::entry::EntryRepository> {
        let conn = self.connection().await?;
        Ok(repositories::entry::EntryRepository::new(conn.clone()))
    }

    async fn publisher_repo(&self) -> Result<repositories::publisher::PublisherRepository> {
        let conn = self.connection().await?;
        Ok(repositories::publisher::PublisherRepository::new(
            conn.clone(),
        ))
    }

    pub async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<EntryRow>> {
        self.entry_repo().await?.list(query).await
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<Option<EntryRow>> {
        self.entry_repo().await?.get(id).await
    }

    pub async fn create_entry(&self, entry: &NewEntry) -> Result<WriteAck> {
        self.entry_repo().await?.create(entry).await
    }

    pub async fn update_entry(&self, id: EntryId, update: &EntryUpdate) -> Result<WriteAck> {
        self.entry_repo().await?.update(id, update).await
    }

    pub async fn delete_entry(&self, id: EntryId) -> Result<WriteAck> {
        self.entry_repo().await?.delete(id).await
    }

    pub async fn list_publishers(&self, filter: &PublisherFilter) -> Result<Vec<Publisher>> {
        let rows = self.publisher_repo().await?.list(filter).await?;
        Ok(rows.into_iter().map(Publisher::from).collect())
    }

    pub async fn publisher_exists(&self, id: PublisherId) -> Result<bool> {
        self.publisher_repo().await?.exists(id).await
    }
}
