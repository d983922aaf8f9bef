//! Domain types for the catalog with strong typing.
//!
//! Newtype ids keep entry and publisher identifiers from being mixed up,
//! and [`Rating`] is the closed set of broadcast ratings an entry may carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a catalog entry.
///
/// # Examples
///
/// ```rust
/// use animecat::domain::EntryId;
///
/// let id = EntryId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntryId(i32);

impl EntryId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Parses a raw identifier as received from a caller.
    ///
    /// Returns `None` unless the value names an id a row could carry.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match EntryRef::parse(raw)? {
            EntryRef::Id(id) => Some(id),
            EntryRef::Unmatchable(_) => None,
        }
    }
}

/// A caller-supplied entry reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRef {
    Id(EntryId),
    /// Numeric, but no row can carry it (fractional or outside the id range).
    Unmatchable(String),
}

impl EntryRef {
    /// Reads a raw reference. `None` when it is absent, blank or not a number.
    ///
    /// ```rust
    /// use animecat::domain::{EntryId, EntryRef};
    ///
    /// assert_eq!(EntryRef::parse(Some("7")), Some(EntryRef::Id(EntryId::new(7))));
    /// assert_eq!(EntryRef::parse(Some("1.5")), Some(EntryRef::Unmatchable("1.5".into())));
    /// assert_eq!(EntryRef::parse(Some("abc")), None);
    /// ```
    #[must_use]
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let s = raw.map(str::trim).filter(|s| !s.is_empty())?;

        if let Ok(id) = s.parse::<i32>() {
            return Some(Self::Id(EntryId(id)));
        }

        let n = s.parse::<f64>().ok().filter(|n| !n.is_nan())?;
        let in_range = n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX);
        if in_range && n.fract() == 0.0 {
            return Some(Self::Id(EntryId(n as i32)));
        }

        Some(Self::Unmatchable(s.to_string()))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntryId> for i32 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl From<i32> for EntryId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for EntryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Self::new)
    }
}

/// Identifier of a publisher record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublisherId(i32);

impl PublisherId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// TV parental guideline rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "TV-MA")]
    Mature,
    #[serde(rename = "TV-14")]
    Fourteen,
    #[serde(rename = "TV-PG")]
    ParentalGuidance,
    #[serde(rename = "TV-G")]
    General,
    #[serde(rename = "TV-Y7")]
    YouthSeven,
}

impl Rating {
    pub const ALL: [Self; 5] = [
        Self::Mature,
        Self::Fourteen,
        Self::ParentalGuidance,
        Self::General,
        Self::YouthSeven,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mature => "TV-MA",
            Self::Fourteen => "TV-14",
            Self::ParentalGuidance => "TV-PG",
            Self::General => "TV-G",
            Self::YouthSeven => "TV-Y7",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|r| r.as_str() == s).ok_or(())
    }
}
