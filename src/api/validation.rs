//! Field checks for the entry form.
//!
//! Errors come back in a fixed order (image first, then the text fields in
//! form order) so clients can render them predictably.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{PublisherId, Rating};
use crate::models::entry::{EntryUpdate, NewEntry};
use crate::services::upload::UploadedImage;
use crate::services::{FieldError, PUBLISHER_ID_MESSAGE};

pub const TITLE_MESSAGE: &str = "Please enter a title";
pub const DATE_MESSAGE: &str = "Please enter date in YYYY-MM-DD format.";
pub const RATING_MESSAGE: &str = "Please enter a valid rating.";
pub const STYLE_MESSAGE: &str = "Please enter an anime style.";
pub const STARS_MESSAGE: &str = "Please enter a star score between 1 and 5.";
pub const SUMMARY_MESSAGE: &str = "Please enter a summary.";
pub const SEASONS_MESSAGE: &str = "Please enter a number of seasons.";
pub const IMAGE_MISSING_MESSAGE: &str = "Please upload an image file.";
pub const IMAGE_TYPE_MESSAGE: &str = "Only JPG, JPEG, and PNG files are allowed.";

const MAX_TITLE_CHARS: usize = 255;

/// Raw multipart form as submitted. Every text field may be missing.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub anime_title: Option<String>,
    pub date: Option<String>,
    pub rating: Option<String>,
    pub style: Option<String>,
    pub stars: Option<String>,
    pub show_summary: Option<String>,
    pub num_of_seasons: Option<String>,
    pub publisher_id: Option<String>,
    /// Filename of the cover already stored for the entry being edited.
    pub old_image: Option<String>,
    pub title_image: Option<UploadedImage>,
}

/// Text fields that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub anime_title: String,
    pub date: String,
    pub rating: Rating,
    pub style: String,
    pub stars: i32,
    pub show_summary: String,
    pub num_of_seasons: i32,
}

impl EntryFields {
    #[must_use]
    pub fn into_new_entry(self, title_image: String, publisher_id: PublisherId) -> NewEntry {
        NewEntry {
            anime_title: self.anime_title,
            date: self.date,
            rating: self.rating,
            title_image,
            style: self.style,
            show_summary: self.show_summary,
            num_of_seasons: self.num_of_seasons,
            stars: self.stars,
            publisher_id,
        }
    }

    #[must_use]
    pub fn into_update(self, title_image: Option<String>) -> EntryUpdate {
        EntryUpdate {
            anime_title: Some(self.anime_title),
            date: Some(self.date),
            rating: Some(self.rating),
            title_image,
            style: Some(self.style),
            show_summary: Some(self.show_summary),
            num_of_seasons: Some(self.num_of_seasons),
            stars: Some(self.stars),
        }
    }
}

/// A form accepted for creation: the cover is present and allowed.
#[derive(Debug)]
pub struct ValidCreate {
    pub fields: EntryFields,
    pub publisher_id: PublisherId,
    pub image: UploadedImage,
}

/// A form accepted for update: a new cover is optional.
#[derive(Debug)]
pub struct ValidUpdate {
    pub fields: EntryFields,
    pub image: Option<UploadedImage>,
    pub old_image: Option<String>,
}

pub fn validate_create(form: EntryForm) -> Result<ValidCreate, Vec<FieldError>> {
    let mut errors = Vec::new();

    match &form.title_image {
        None => errors.push(FieldError::new("title_image", IMAGE_MISSING_MESSAGE)),
        Some(image) if !image.has_allowed_type() => {
            errors.push(FieldError::new("title_image", IMAGE_TYPE_MESSAGE));
        }
        Some(_) => {}
    }

    let fields = check_fields(&form, &mut errors);

    let publisher_id = form
        .publisher_id
        .as_deref()
        .and_then(|raw| parse_int_in(raw, 1, i32::MAX))
        .map(PublisherId::new);
    if publisher_id.is_none() {
        errors.push(FieldError::new("publisher_id", PUBLISHER_ID_MESSAGE));
    }

    match (fields, publisher_id, form.title_image) {
        (Some(fields), Some(publisher_id), Some(image)) if errors.is_empty() => Ok(ValidCreate {
            fields,
            publisher_id,
            image,
        }),
        _ => Err(errors),
    }
}

/// Same checks as creation minus the publisher, which an update never
/// changes, and with the cover optional.
pub fn validate_update(form: EntryForm) -> Result<ValidUpdate, Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(image) = &form.title_image
        && !image.has_allowed_type()
    {
        errors.push(FieldError::new("title_image", IMAGE_TYPE_MESSAGE));
    }

    let fields = check_fields(&form, &mut errors);

    match fields {
        Some(fields) if errors.is_empty() => Ok(ValidUpdate {
            fields,
            image: form.title_image,
            old_image: form.old_image.filter(|s| !s.is_empty()),
        }),
        _ => Err(errors),
    }
}

fn check_fields(form: &EntryForm, errors: &mut Vec<FieldError>) -> Option<EntryFields> {
    let anime_title = form
        .anime_title
        .as_deref()
        .filter(|t| (1..=MAX_TITLE_CHARS).contains(&t.chars().count()));
    if anime_title.is_none() {
        errors.push(FieldError::new("anime_title", TITLE_MESSAGE));
    }

    let date = form.date.as_deref().filter(|d| is_iso_date(d));
    if date.is_none() {
        errors.push(FieldError::new("date", DATE_MESSAGE));
    }

    let rating = form.rating.as_deref().and_then(|r| r.parse::<Rating>().ok());
    if rating.is_none() {
        errors.push(FieldError::new("rating", RATING_MESSAGE));
    }

    let style = non_empty(form.style.as_deref());
    if style.is_none() {
        errors.push(FieldError::new("style", STYLE_MESSAGE));
    }

    let stars = form.stars.as_deref().and_then(|s| parse_int_in(s, 1, 5));
    if stars.is_none() {
        errors.push(FieldError::new("stars", STARS_MESSAGE));
    }

    let show_summary = non_empty(form.show_summary.as_deref());
    if show_summary.is_none() {
        errors.push(FieldError::new("show_summary", SUMMARY_MESSAGE));
    }

    let num_of_seasons = form
        .num_of_seasons
        .as_deref()
        .and_then(|s| parse_int_in(s, 1, 100));
    if num_of_seasons.is_none() {
        errors.push(FieldError::new("num_of_seasons", SEASONS_MESSAGE));
    }

    Some(EntryFields {
        anime_title: anime_title?.to_string(),
        date: date?.to_string(),
        rating: rating?,
        style: style?.to_string(),
        stars: stars?,
        show_summary: show_summary?.to_string(),
        num_of_seasons: num_of_seasons?,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Whole-string integer within `min..=max`. No surrounding whitespace.
fn parse_int_in(raw: &str, min: i32, max: i32) -> Option<i32> {
    raw.parse::<i32>()
        .ok()
        .filter(|n| (min..=max).contains(n))
}

/// `YYYY-MM-DD` that also names a real calendar day.
fn is_iso_date(raw: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex"));

    re.is_match(raw) && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}
