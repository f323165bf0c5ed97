//! Shaping of raw store documents into result items

use super::types::{EntityKind, SearchResultItem};
use crate::store::Document;

/// Candidate fields for a user's photo, in priority order
pub const USER_PHOTO_FIELDS: &[&str] = &["photoUrl", "photoURL"];

/// Candidate fields for a channel's photo
pub const CHANNEL_PHOTO_FIELDS: &[&str] = &["photoUrl"];

/// Title used for users without a first name
pub const DEFAULT_USER_TITLE: &str = "User";

/// First candidate field holding a string value
pub fn first_present<'a>(document: &'a Document, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|field| document.get_str(field))
}

/// A user document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
}

impl UserRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            username: document.get_str("username").map(String::from),
            first_name: document.get_str("firstName").map(String::from),
            last_name: document.get_str("lastName").map(String::from),
            photo_url: first_present(document, USER_PHOTO_FIELDS).map(String::from),
        }
    }

    /// `"{first} {last}"` trimmed, or the default label without a first name
    pub fn display_title(&self) -> String {
        match self.first_name.as_deref() {
            Some(first) if !first.is_empty() => {
                let last = self.last_name.as_deref().unwrap_or("");
                format!("{} {}", first, last).trim().to_string()
            }
            _ => DEFAULT_USER_TITLE.to_string(),
        }
    }

    pub fn into_item(self) -> SearchResultItem {
        SearchResultItem {
            title: self.display_title(),
            id: self.id,
            kind: EntityKind::User,
            username: self.username,
            photo_url: self.photo_url,
        }
    }
}

/// A channel document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: String,
    pub title: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
}

impl ChannelRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            title: document.get_str("title").map(String::from),
            username: document.get_str("username").map(String::from),
            photo_url: first_present(document, CHANNEL_PHOTO_FIELDS).map(String::from),
        }
    }

    pub fn into_item(self) -> SearchResultItem {
        SearchResultItem {
            id: self.id,
            kind: EntityKind::Channel,
            // Stored casing is kept for display
            title: self.title.unwrap_or_default(),
            username: self.username,
            photo_url: self.photo_url,
        }
    }
}

/// Shape a document of the given kind
pub fn shape(kind: EntityKind, document: &Document) -> SearchResultItem {
    match kind {
        EntityKind::User => UserRecord::from_document(document).into_item(),
        EntityKind::Channel => ChannelRecord::from_document(document).into_item(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_title() {
        let full = Document::new("u1")
            .field("firstName", "Ana")
            .field("lastName", "Lima");
        assert_eq!(shape(EntityKind::User, &full).title, "Ana Lima");

        let first_only = Document::new("u2").field("firstName", "Ana");
        assert_eq!(shape(EntityKind::User, &first_only).title, "Ana");

        let last_only = Document::new("u3").field("lastName", "Lima");
        assert_eq!(shape(EntityKind::User, &last_only).title, "User");

        let empty_first = Document::new("u4").field("firstName", "");
        assert_eq!(shape(EntityKind::User, &empty_first).title, "User");
    }

    #[test]
    fn test_photo_fallback_order() {
        let both = Document::new("u1")
            .field("photoUrl", "primary")
            .field("photoURL", "legacy");
        assert_eq!(first_present(&both, USER_PHOTO_FIELDS), Some("primary"));

        let legacy = Document::new("u2").field("photoURL", "legacy");
        assert_eq!(first_present(&legacy, USER_PHOTO_FIELDS), Some("legacy"));

        let wrong_type = Document::new("u3")
            .field("photoUrl", 7)
            .field("photoURL", "legacy");
        assert_eq!(first_present(&wrong_type, USER_PHOTO_FIELDS), Some("legacy"));

        let none = Document::new("u4");
        assert_eq!(first_present(&none, USER_PHOTO_FIELDS), None);
    }

    #[test]
    fn test_user_item() {
        let doc = Document::new("u1")
            .field("username", "telegram_fan")
            .field("firstName", "Ana")
            .field("photoURL", "https://cdn/ana.png");

        assert_eq!(
            shape(EntityKind::User, &doc),
            SearchResultItem::new("u1", EntityKind::User, "Ana")
                .with_username("telegram_fan")
                .with_photo_url("https://cdn/ana.png")
        );
    }

    #[test]
    fn test_channel_item_is_verbatim() {
        let doc = Document::new("c1")
            .field("title", "Telegram News")
            .field("username", "tgnews")
            .field("photoURL", "ignored");

        let item = shape(EntityKind::Channel, &doc);
        assert_eq!(item.title, "Telegram News");
        assert_eq!(item.username.as_deref(), Some("tgnews"));
        assert_eq!(item.photo_url, None);
    }
}
