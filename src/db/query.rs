//! Query builder for catalog listings.
//!
//! Raw filter strings are turned into an ordered list of [`Predicate`]s, a
//! [`SortColumn`] drawn from a closed set, and an optional limit. Every value
//! ends up as a bound parameter; nothing from the request is spliced into SQL.

use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::entities::{anime_entries, publishers};
use crate::models::entry::EntryFilter;

/// Columns matched as case-insensitive substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchColumn {
    AnimeTitle,
    Date,
    PublisherName,
}

impl SearchColumn {
    fn contains(self, value: &str) -> SimpleExpr {
        let key = search_key(value);
        match self {
            Self::AnimeTitle => anime_entries::Column::AnimeTitleFolded.contains(&key),
            Self::Date => anime_entries::Column::Date.contains(&key),
            Self::PublisherName => publishers::Column::NameFolded.contains(&key),
        }
    }
}

/// Columns matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactColumn {
    Rating,
    Style,
    Stars,
}

impl ExactColumn {
    fn equals(self, value: sea_orm::Value) -> SimpleExpr {
        match self {
            Self::Rating => anime_entries::Column::Rating.eq(value),
            Self::Style => anime_entries::Column::Style.eq(value),
            Self::Stars => anime_entries::Column::Stars.eq(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl From<FilterValue> for sea_orm::Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Text(s) => s.into(),
            FilterValue::Integer(n) => n.into(),
        }
    }
}

/// One listing filter. The operator is fixed by the kind of column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Contains { column: SearchColumn, value: String },
    Equals { column: ExactColumn, value: FilterValue },
}

impl Predicate {
    fn expr(&self) -> SimpleExpr {
        match self {
            Self::Contains { column, value } => column.contains(value),
            Self::Equals { column, value } => column.equals(value.clone().into()),
        }
    }
}

/// Folds text for case-insensitive matching across all of Unicode.
///
/// Stored search columns hold this form of their source column, and filter
/// values are folded the same way before comparison.
#[must_use]
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

/// Columns a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    AnimeTitle,
    Date,
    Rating,
    Style,
    Stars,
    PublisherName,
    NumOfSeasons,
}

impl SortColumn {
    pub const ALL: [Self; 7] = [
        Self::AnimeTitle,
        Self::Date,
        Self::Rating,
        Self::Style,
        Self::Stars,
        Self::PublisherName,
        Self::NumOfSeasons,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnimeTitle => "anime_title",
            Self::Date => "date",
            Self::Rating => "rating",
            Self::Style => "style",
            Self::Stars => "stars",
            Self::PublisherName => "publisher_name",
            Self::NumOfSeasons => "num_of_seasons",
        }
    }

    /// Anything outside the allow-list falls back to the title.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        param
            .and_then(|p| Self::ALL.into_iter().find(|c| c.as_str() == p))
            .unwrap_or_default()
    }

    fn apply<E: EntityTrait>(self, select: Select<E>) -> Select<E> {
        match self {
            Self::AnimeTitle => select.order_by_asc(anime_entries::Column::AnimeTitle),
            Self::Date => select.order_by_asc(anime_entries::Column::Date),
            Self::Rating => select.order_by_asc(anime_entries::Column::Rating),
            Self::Style => select.order_by_asc(anime_entries::Column::Style),
            Self::Stars => select.order_by_asc(anime_entries::Column::Stars),
            Self::PublisherName => select.order_by_asc(publishers::Column::Name),
            Self::NumOfSeasons => select.order_by_asc(anime_entries::Column::NumOfSeasons),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub predicates: Vec<Predicate>,
    pub sort: SortColumn,
    /// `None` means no row cap.
    pub limit: Option<u64>,
}

impl EntryQuery {
    /// Builds a query from raw filters.
    ///
    /// Text filters (title, date, publisher name) match as substrings, rating
    /// and style match exactly, and blank values are ignored. `stars` applies
    /// only when it starts with an integer. A missing, zero or non-numeric
    /// `limit` becomes `default_limit`; a negative one lifts the cap.
    #[must_use]
    pub fn from_filter(filter: &EntryFilter, default_limit: u64) -> Self {
        let mut predicates = Vec::new();

        let searches = [
            (SearchColumn::AnimeTitle, &filter.title),
            (SearchColumn::Date, &filter.date),
            (SearchColumn::PublisherName, &filter.publisher_name),
        ];
        for (column, value) in searches {
            if let Some(value) = non_blank(value.as_deref()) {
                predicates.push(Predicate::Contains {
                    column,
                    value: value.to_string(),
                });
            }
        }

        for (column, value) in [
            (ExactColumn::Rating, &filter.rating),
            (ExactColumn::Style, &filter.style),
        ] {
            if let Some(value) = non_blank(value.as_deref()) {
                predicates.push(Predicate::Equals {
                    column,
                    value: FilterValue::Text(value.to_string()),
                });
            }
        }

        if let Some(stars) = filter.stars.as_deref().and_then(parse_int_prefix) {
            predicates.push(Predicate::Equals {
                column: ExactColumn::Stars,
                value: FilterValue::Integer(stars),
            });
        }

        let limit = match filter.limit.as_deref().and_then(parse_int_prefix) {
            Some(n) if n > 0 => u64::try_from(n).ok(),
            Some(n) if n < 0 => None,
            _ => Some(default_limit),
        };

        Self {
            predicates,
            sort: SortColumn::from_param(filter.sort_by.as_deref()),
            limit,
        }
    }

    #[must_use]
    pub fn condition(&self) -> Condition {
        self.predicates
            .iter()
            .fold(Condition::all(), |cond, p| cond.add(p.expr()))
    }

    /// Applies predicates, ordering and limit to a select. Ties on the sort
    /// column are broken by entry id so repeated listings are stable.
    #[must_use]
    pub fn apply<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        let select = self
            .sort
            .apply(select.filter(self.condition()))
            .order_by_asc(anime_entries::Column::Id);

        match self.limit {
            Some(limit) => select.limit(limit),
            None => select,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads the leading integer of a string, ignoring leading whitespace and
/// any trailing garbage ("3 stars" is 3, "abc" is nothing).
#[must_use]
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
