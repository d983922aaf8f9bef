use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::publisher::{Publisher, PublisherFilter};

const LIST_FAILED: &str = "Server error fetching publishers.";

/// `GET /publisher?name=`
pub async fn list_publishers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PublisherFilter>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Publisher>>>, ApiError> {
    let Query(filter) = query?;
    let publishers = state
        .catalog()
        .list_publishers(&filter)
        .await
        .map_err(|e| ApiError::from_catalog(e, LIST_FAILED, LIST_FAILED))?;

    Ok(Json(ApiResponse::success(publishers)))
}
