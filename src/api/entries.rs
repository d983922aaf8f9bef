use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use super::validation::{self, EntryForm};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::EntryId;
use crate::models::entry::{EntryFilter, EntryRow};
use crate::services::UploadedImage;

const LIST_FAILED: &str = "Something went wrong with the server.";
const GET_FAILED: &str = "Error fetching anime data.";
const CREATE_FAILED: &str = "Failed to save anime to database.";
const UPDATE_FAILED: &str = "Failed to update entry.";
const DELETE_FAILED: &str = "Database delete failed.";

const ANIME_NOT_FOUND: &str = "Anime not found.";
const ENTRY_NOT_FOUND: &str = "Anime entry not found.";

const CREATED: &str = "Form submitted and data saved successfully!";
const UPDATED: &str = "Anime entry updated successfully.";
const DELETED: &str = "Anime entry deleted successfully.";

/// `GET /animeForm`
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EntryFilter>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<EntryRow>>>, ApiError> {
    let Query(filter) = query?;
    let rows = state
        .catalog()
        .list_entries(&filter)
        .await
        .map_err(|e| ApiError::from_catalog(e, LIST_FAILED, ANIME_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(rows)))
}

/// `GET /animeForm/{id}`
///
/// An id that is not a number cannot match a row, so it is a 404 like any
/// other miss.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<EntryRow>>, ApiError> {
    let id = EntryId::parse(Some(&raw_id)).ok_or_else(|| ApiError::not_found(ANIME_NOT_FOUND))?;

    let row = state
        .catalog()
        .get_entry(id)
        .await
        .map_err(|e| ApiError::from_catalog(e, GET_FAILED, ANIME_NOT_FOUND))?
        .ok_or_else(|| ApiError::not_found(ANIME_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(row)))
}

/// `POST /animeForm`
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let form = read_form(multipart).await?;
    let valid = validation::validate_create(form).map_err(ApiError::Validation)?;

    let filename = state
        .uploads()
        .save(&valid.image)
        .await
        .map_err(|e| ApiError::internal(CREATE_FAILED, format!("{e:#}")))?;

    let entry = valid
        .fields
        .into_new_entry(filename.clone(), valid.publisher_id);

    match state.catalog().create_entry(&entry).await {
        Ok(_) => Ok(Json(ApiResponse::message(CREATED))),
        Err(e) => {
            state.uploads().discard(&filename).await;
            Err(ApiError::from_catalog(e, CREATE_FAILED, ENTRY_NOT_FOUND))
        }
    }
}

/// `PUT /animeForm/{id}`
///
/// Every editable field is replaced. Without a new upload the cover falls
/// back to `old_image`.
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let form = read_form(multipart).await?;
    let valid = validation::validate_update(form).map_err(ApiError::Validation)?;

    let id = EntryId::parse(Some(&raw_id)).ok_or_else(|| ApiError::not_found(ENTRY_NOT_FOUND))?;

    let stored = match &valid.image {
        Some(image) => Some(
            state
                .uploads()
                .save(image)
                .await
                .map_err(|e| ApiError::internal(UPDATE_FAILED, format!("{e:#}")))?,
        ),
        None => None,
    };

    let title_image = stored.clone().or(valid.old_image);
    let update = valid.fields.into_update(title_image);

    match state.catalog().update_entry(id, &update).await {
        Ok(_) => Ok(Json(ApiResponse::message(UPDATED))),
        Err(e) => {
            if let Some(filename) = &stored {
                state.uploads().discard(filename).await;
            }
            Err(ApiError::from_catalog(e, UPDATE_FAILED, ENTRY_NOT_FOUND))
        }
    }
}

/// `DELETE /animeForm/{id}`
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .catalog()
        .delete_entry(Some(&raw_id))
        .await
        .map_err(|e| ApiError::from_catalog(e, DELETE_FAILED, ENTRY_NOT_FOUND))?;

    Ok(Json(ApiResponse::message(DELETED)))
}

/// Collects the multipart body into an [`EntryForm`]. A file part with no
/// filename and no content counts as no upload; the first value of a
/// repeated field wins.
async fn read_form(mut multipart: Multipart) -> Result<EntryForm, ApiError> {
    let mut form = EntryForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidArgument(format!("Invalid form data: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "title_image" {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidArgument(format!("Invalid form data: {e}")))?;

            if (original_name.is_empty() && bytes.is_empty()) || form.title_image.is_some() {
                continue;
            }

            form.title_image = Some(UploadedImage {
                original_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::InvalidArgument(format!("Invalid form data: {e}")))?;

        let slot = match name.as_str() {
            "anime_title" => &mut form.anime_title,
            "date" => &mut form.date,
            "rating" => &mut form.rating,
            "style" => &mut form.style,
            "stars" => &mut form.stars,
            "show_summary" => &mut form.show_summary,
            "num_of_seasons" => &mut form.num_of_seasons,
            "publisher_id" => &mut form.publisher_id,
            "old_image" => &mut form.old_image,
            _ => continue,
        };

        if slot.is_none() {
            *slot = Some(value);
        }
    }

    Ok(form)
}
