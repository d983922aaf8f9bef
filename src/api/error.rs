use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{CatalogError, FieldError};

pub const INVALID_REQUEST_MESSAGE: &str = "Request fields or files are invalid.";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    Validation(Vec<FieldError>),

    InvalidArgument(String),

    /// `public` is sent to the client, `detail` only goes to the log.
    DatabaseError { public: String, detail: String },

    InternalError { public: String, detail: String },

    ServiceUnavailable(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Validation(errors) => write!(f, "Validation error: {} field(s)", errors.len()),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::DatabaseError { detail, .. } => write!(f, "Database error: {detail}"),
            Self::InternalError { detail, .. } => write!(f, "Internal error: {detail}"),
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::invalid(INVALID_REQUEST_MESSAGE, errors)),
            )
                .into_response(),
            Self::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ApiResponse::message(msg))).into_response()
            }
            Self::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, Json(ApiResponse::message(msg))).into_response()
            }
            Self::DatabaseError { public, detail } => {
                tracing::error!("Database error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::message(public)),
                )
                    .into_response()
            }
            Self::InternalError { public, detail } => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::message(public)),
                )
                    .into_response()
            }
            Self::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ApiResponse::message(msg)),
                )
                    .into_response()
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(public: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::InternalError {
            public: public.into(),
            detail: detail.to_string(),
        }
    }

    /// Maps a catalog failure onto a response. `failure` is the client-facing
    /// text for storage errors and `not_found` the text for missing rows.
    pub fn from_catalog(err: CatalogError, failure: &str, not_found: &str) -> Self {
        match err {
            CatalogError::Validation(errors) => Self::Validation(errors),
            CatalogError::NotFound(_) => Self::NotFound(not_found.to_string()),
            CatalogError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            CatalogError::Storage(detail) => Self::DatabaseError {
                public: failure.to_string(),
                detail,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryId;

    #[test]
    fn catalog_errors_map_to_status_codes() {
        let status = |err: CatalogError| {
            ApiError::from_catalog(err, "failed", "missing")
                .into_response()
                .status()
        };

        assert_eq!(
            status(CatalogError::Validation(vec![])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(CatalogError::NotFound(EntryId::new(1).to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(CatalogError::InvalidArgument("Invalid ID: abc".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(CatalogError::Storage("disk I/O error".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_detail_is_not_public() {
        let err = ApiError::from_catalog(
            CatalogError::Storage("no such table: anime_entries".into()),
            "Database delete failed.",
            "Anime entry not found.",
        );
        match err {
            ApiError::DatabaseError { public, detail } => {
                assert_eq!(public, "Database delete failed.");
                assert!(detail.contains("no such table"));
            }
            other => panic!("unexpected: {other}"),
        }
    }
}
