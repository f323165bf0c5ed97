//! Result type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kind a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Channel,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single search result as sent to the mention UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Store identifier of the entity
    pub id: String,
    /// Entity kind, serialized as `kind`
    pub kind: EntityKind,
    /// Display title
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl SearchResultItem {
    pub fn new(id: impl Into<String>, kind: EntityKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            username: None,
            photo_url: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_serialization() {
        let item = SearchResultItem::new("u1", EntityKind::User, "Ana")
            .with_username("telegram_fan")
            .with_photo_url("https://cdn/ana.png");

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "id": "u1",
                "kind": "user",
                "title": "Ana",
                "username": "telegram_fan",
                "photoUrl": "https://cdn/ana.png"
            })
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let item = SearchResultItem::new("c1", EntityKind::Channel, "news");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({ "id": "c1", "kind": "channel", "title": "news" })
        );
    }
}
