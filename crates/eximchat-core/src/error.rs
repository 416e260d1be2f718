//! Error types for EximChat.

use thiserror::Error;

/// A shared error type for the EximChat crates.
///
/// Gateway failures carry the human-readable message from the backend
/// payload when one was present, so the controller can surface it verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// The chat backend answered with a non-success status.
    #[error("Gateway error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Gateway {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a response (connect, timeout, broken body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend rejected the credentials.
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("login required"))]
    Unauthorized(Option<String>),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Gateway error from a status code and optional payload message.
    pub fn gateway(status: u16, message: Option<String>) -> Self {
        Self::Gateway { status, message }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Gateway error
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Gateway { status: 404, .. })
    }

    /// Check if this is an Unauthorized error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns the message the backend put in its failure payload, if any.
    ///
    /// Only gateway-originated errors carry such a message; everything else
    /// returns `None` so callers fall back to their own wording.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Gateway { message, .. } | Self::Unauthorized(message) => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Human-readable message for display, falling back to `default`.
    pub fn user_message_or(&self, default: &str) -> String {
        self.user_message().unwrap_or(default).to_string()
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_from_gateway_payload() {
        let err = ChatError::gateway(429, Some("Rate limited".to_string()));
        assert_eq!(err.user_message(), Some("Rate limited"));
        assert_eq!(err.user_message_or("Failed"), "Rate limited");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ChatError::gateway(500, None);
        assert_eq!(err.user_message(), None);
        assert_eq!(err.user_message_or("Failed to send message"), "Failed to send message");

        let blank = ChatError::gateway(500, Some("   ".to_string()));
        assert_eq!(blank.user_message(), None);

        let transport = ChatError::transport("connection refused");
        assert_eq!(transport.user_message_or("Failed"), "Failed");
    }

    #[test]
    fn test_predicates() {
        assert!(ChatError::gateway(404, None).is_not_found());
        assert!(ChatError::not_found("Session", "7").is_not_found());
        assert!(ChatError::transport("x").is_transport());
        assert!(!ChatError::config("x").is_gateway());
        assert!(ChatError::Unauthorized(None).is_unauthorized());
    }

    #[test]
    fn test_display() {
        let err = ChatError::gateway(503, None);
        assert_eq!(err.to_string(), "Gateway error (status 503): no message");
    }
}
