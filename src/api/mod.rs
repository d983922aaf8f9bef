use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    routing::get,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{CatalogService, UploadService};
use crate::state::SharedState;

mod entries;
mod error;
mod observability;
mod publishers;
mod system;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog
    }

    #[must_use]
    pub fn uploads(&self) -> &Arc<UploadService> {
        &self.shared.uploads
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config)?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let public_dir = Path::new(&server.public_path);
    let index = ServeFile::new(public_dir.join(&server.index_file));
    let public = ServeDir::new(public_dir).not_found_service(not_found.into_service());
    let uploads = ServeDir::new(&server.uploads_path).not_found_service(not_found.into_service());

    let cors_layer = cors_layer(&server.cors_allowed_origins);
    let body_limit = DefaultBodyLimit::max(server.max_upload_bytes);

    let api_router = Router::new()
        .route(
            "/animeForm",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route(
            "/animeForm/",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route(
            "/animeForm/{id}",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/publisher", get(publishers::list_publishers))
        .route("/health", get(system::health_ready))
        .route("/health/live", get(system::health_live))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    Router::new()
        .merge(api_router)
        .route_service("/", index)
        .nest_service("/uploads", uploads)
        .fallback_service(public)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(observability::track_requests))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer)
                .layer(body_limit),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = if origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    layer
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
