pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService, FieldError};

pub mod catalog_service_impl;
pub use catalog_service_impl::{PUBLISHER_ID_MESSAGE, SeaOrmCatalogService};

pub mod upload;
pub use upload::{UploadService, UploadedImage};
