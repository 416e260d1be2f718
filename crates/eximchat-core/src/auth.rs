//! Authentication session.
//!
//! Login state is an explicit value created at startup and handed to the
//! gateway, instead of flags read from ambient storage.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Credentials of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token issued by the backend
    #[serde(default)]
    pub token: Option<String>,
    /// Display name of the user
    #[serde(default)]
    pub username: Option<String>,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, username: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            username,
        }
    }

    /// A session with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Persistence for the auth session.
///
/// A missing record loads as [`AuthSession::anonymous`].
#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn load(&self) -> Result<AuthSession>;

    async fn save(&self, session: &AuthSession) -> Result<()>;

    /// Removes stored credentials. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;
}
