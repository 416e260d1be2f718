//! Session domain model.
//!
//! A session is a persisted conversation thread owned by the chat backend.
//! The client only ever holds copies of what the backend returned.

use super::id::SessionId;
use super::message::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title shown for sessions the backend has not named yet.
pub const PLACEHOLDER_TITLE: &str = "New conversation";

/// Summary of a conversation thread as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned identifier
    pub id: SessionId,
    /// Human-readable title, if the backend produced one
    #[serde(default)]
    pub title: Option<String>,
    /// Number of messages stored in the thread
    #[serde(default)]
    pub message_count: u32,
    /// Last time the thread changed on the server
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session known only by its id, as returned from the first send.
    pub fn stub(id: SessionId) -> Self {
        Self {
            id,
            title: None,
            message_count: 0,
            updated_at: None,
        }
    }

    /// Title for display, falling back to [`PLACEHOLDER_TITLE`].
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(PLACEHOLDER_TITLE)
    }
}

/// A session together with its full transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;

    #[test]
    fn test_display_title_fallback() {
        let mut session = Session::stub(SessionId::from(1u64));
        assert_eq!(session.display_title(), PLACEHOLDER_TITLE);

        session.title = Some("  ".to_string());
        assert_eq!(session.display_title(), PLACEHOLDER_TITLE);

        session.title = Some("Dokumen ekspor kopi".to_string());
        assert_eq!(session.display_title(), "Dokumen ekspor kopi");
    }

    #[test]
    fn test_deserialize_listing_with_missing_fields() {
        let session: Session = serde_json::from_str(r#"{ "id": 42 }"#).unwrap();
        assert_eq!(session, Session::stub(SessionId::from(42u64)));
    }

    #[test]
    fn test_deserialize_detail() {
        let json = r#"{
            "id": 7,
            "title": "Incoterms",
            "message_count": 2,
            "updated_at": "2024-05-01T10:00:00Z",
            "messages": [
                { "role": "user", "content": "Apa itu FOB?", "created_at": "2024-05-01T09:59:58Z" },
                { "role": "assistant", "content": "FOB adalah...", "created_at": "2024-05-01T10:00:00Z" }
            ]
        }"#;
        let detail: SessionDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.session.id.as_str(), "7");
        assert_eq!(detail.session.message_count, 2);
        assert_eq!(detail.messages.len(), 2);
        assert_eq!(detail.messages[1].role, MessageRole::Assistant);
    }
}
