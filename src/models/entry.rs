use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::{PublisherId, Rating};

/// An entry joined with its publisher, as returned by every catalog read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct EntryRow {
    pub anime_id: i32,
    pub anime_title: Option<String>,
    pub date: Option<String>,
    pub rating: Option<String>,
    pub title_image: Option<String>,
    pub style: Option<String>,
    pub show_summary: Option<String>,
    pub num_of_seasons: Option<i32>,
    pub stars: Option<i32>,
    pub publisher_id: i32,
    pub publisher_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Fields for a new entry. `title_image` is the filename the upload
/// handler already stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub anime_title: String,
    pub date: String,
    pub rating: Rating,
    pub title_image: String,
    pub style: String,
    pub show_summary: String,
    pub num_of_seasons: i32,
    pub stars: i32,
    pub publisher_id: PublisherId,
}

/// Replacement values for an existing entry.
///
/// Every editable column is overwritten: a `None` here is stored as NULL.
/// Callers that want to keep the current cover must pass its filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub anime_title: Option<String>,
    pub date: Option<String>,
    pub rating: Option<Rating>,
    pub title_image: Option<String>,
    pub style: Option<String>,
    pub show_summary: Option<String>,
    pub num_of_seasons: Option<i32>,
    pub stars: Option<i32>,
}

/// Raw list filters, straight from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub publisher_name: Option<String>,
    pub rating: Option<String>,
    pub style: Option<String>,
    pub stars: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub limit: Option<String>,
}

/// Storage acknowledgement for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteAck {
    pub rows_affected: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<i32>,
}

impl WriteAck {
    #[must_use]
    pub const fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    #[must_use]
    pub const fn inserted(id: i32) -> Self {
        Self {
            rows_affected: 1,
            last_insert_id: Some(id),
        }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.rows_affected == 0
    }
}
