use anyhow::Context;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{CatalogService, SeaOrmCatalogService, UploadService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub catalog: Arc<dyn CatalogService>,

    pub uploads: Arc<UploadService>,
}

impl SharedState {
    /// Wires services from config. The database is not opened here; the
    /// store connects on its first query.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let default_limit = u64::try_from(config.catalog.default_limit)
            .context("catalog.default_limit must be positive")?;

        let store = Store::new(&config.general.database_path);

        let catalog = Arc::new(SeaOrmCatalogService::new(store.clone(), default_limit))
            as Arc<dyn CatalogService>;

        let uploads = Arc::new(UploadService::new(&config.server.uploads_path));

        Ok(Self {
            config: Arc::new(config),
            store,
            catalog,
            uploads,
        })
    }
}
