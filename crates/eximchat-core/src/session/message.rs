//! Conversation message types.
//!
//! This module contains types for representing messages in a transcript,
//! including roles, content and optional response metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply produced by the assistant backend.
    Assistant,
}

/// Extra information the backend attaches to assistant replies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Time the backend spent producing the reply, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

/// A single message in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// When the message was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Optional backend metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    /// Builds a user message stamped with the local clock.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
            metadata: None,
        }
    }

    /// Builds an assistant message carrying the reported response time.
    pub fn assistant(content: impl Into<String>, response_time: Option<f64>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            metadata: response_time.map(|t| MessageMetadata {
                response_time: Some(t),
            }),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Response time in seconds, when the backend reported one.
    pub fn response_time(&self) -> Option<f64> {
        self.metadata.as_ref().and_then(|m| m.response_time)
    }
}
