//! Query handling module
//!
//! Handles normalizing raw queries into search keys:
//! - Queries shorter than the minimum length are not searched
//! - Keys are lowercased, nothing else (no trimming, no tokenizing)
//! - Keys become `[key, key + U+F8FF]` prefix ranges for the store
//!
//! Also parses the `type` filter selecting which entity kinds are searched.

use crate::results::EntityKind;
use crate::store::RangeQuery;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest private-use codepoint, sorts after any realistic input
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// A lowercased search key that met the minimum length
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    /// Normalize a raw query
    ///
    /// Returns `None` when the query is absent or shorter than `min_length`
    /// characters, meaning no search should run.
    ///
    /// Length is counted in Unicode scalar values, not UTF-16 code units, so a
    /// single astral character such as an emoji is one character and stays
    /// below a minimum of two.
    pub fn parse(raw: Option<&str>, min_length: usize) -> Option<Self> {
        let raw = raw?;
        if raw.chars().count() < min_length {
            return None;
        }
        Some(Self(raw.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Range covering every value starting with this key
    pub fn prefix_range(&self) -> PrefixRange {
        PrefixRange::new(&self.0)
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive string bounds selecting all values with a given prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRange {
    pub start: String,
    pub end: String,
}

impl PrefixRange {
    pub fn new(prefix: &str) -> Self {
        let mut end = String::with_capacity(prefix.len() + PREFIX_SENTINEL.len_utf8());
        end.push_str(prefix);
        end.push(PREFIX_SENTINEL);

        Self {
            start: prefix.to_string(),
            end,
        }
    }

    /// Store query for this range against one collection field
    pub fn to_query(&self, collection: &str, field: &str, limit: usize) -> RangeQuery {
        RangeQuery::new(collection, field, self.start.clone(), self.end.clone(), limit)
    }
}

/// Which entity kinds a search covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    User,
    Channel,
}

/// A `type` value that names no known filter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid type filter: {0:?}")]
pub struct InvalidTypeFilter(pub String);

impl TypeFilter {
    /// Parse an optional raw filter; absent or empty means `All`
    pub fn parse(raw: Option<&str>) -> Result<Self, InvalidTypeFilter> {
        match raw {
            None | Some("") => Ok(Self::All),
            Some(value) => value.parse(),
        }
    }

    pub fn includes(&self, kind: EntityKind) -> bool {
        match self {
            Self::All => true,
            Self::User => kind == EntityKind::User,
            Self::Channel => kind == EntityKind::Channel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::User => "user",
            Self::Channel => "channel",
        }
    }
}

impl FromStr for TypeFilter {
    type Err = InvalidTypeFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "user" => Ok(Self::User),
            "channel" => Ok(Self::Channel),
            other => Err(InvalidTypeFilter(other.to_string())),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_or_absent_query() {
        assert_eq!(NormalizedQuery::parse(None, 2), None);
        assert_eq!(NormalizedQuery::parse(Some(""), 2), None);
        assert_eq!(NormalizedQuery::parse(Some("a"), 2), None);
        // Length counts characters, not bytes
        assert_eq!(NormalizedQuery::parse(Some("é"), 2), None);
        // An emoji is two UTF-16 code units but one character
        assert_eq!(NormalizedQuery::parse(Some("😀"), 2), None);
        assert!(NormalizedQuery::parse(Some("😀😀"), 2).is_some());
    }

    #[test]
    fn test_lowercase_only() {
        let key = NormalizedQuery::parse(Some("TeL"), 2).unwrap();
        assert_eq!(key.as_str(), "tel");

        let spaced = NormalizedQuery::parse(Some(" Ab "), 2).unwrap();
        assert_eq!(spaced.as_str(), " ab ");
    }

    #[test]
    fn test_prefix_range() {
        let range = NormalizedQuery::parse(Some("tel"), 2)
            .unwrap()
            .prefix_range();
        assert_eq!(range.start, "tel");
        assert_eq!(range.end, "tel\u{f8ff}");

        let query = range.to_query("users", "username", 5);
        assert_eq!(query.collection, "users");
        assert_eq!(query.field, "username");
        assert_eq!(query.limit, 5);
        assert!(query.matches("telegram_fan"));
        assert!(!query.matches("teddy"));
    }

    #[test]
    fn test_type_filter_parse() {
        assert_eq!(TypeFilter::parse(None), Ok(TypeFilter::All));
        assert_eq!(TypeFilter::parse(Some("")), Ok(TypeFilter::All));
        assert_eq!(TypeFilter::parse(Some("all")), Ok(TypeFilter::All));
        assert_eq!(TypeFilter::parse(Some("user")), Ok(TypeFilter::User));
        assert_eq!(TypeFilter::parse(Some("channel")), Ok(TypeFilter::Channel));
        assert_eq!(
            TypeFilter::parse(Some("group")),
            Err(InvalidTypeFilter("group".to_string()))
        );
        assert!(TypeFilter::parse(Some("USER")).is_err());
    }

    #[test]
    fn test_type_filter_includes() {
        assert!(TypeFilter::All.includes(EntityKind::User));
        assert!(TypeFilter::All.includes(EntityKind::Channel));
        assert!(TypeFilter::User.includes(EntityKind::User));
        assert!(!TypeFilter::User.includes(EntityKind::Channel));
        assert!(!TypeFilter::Channel.includes(EntityKind::User));
    }
}
