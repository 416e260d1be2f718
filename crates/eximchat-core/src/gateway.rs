//! Chat gateway trait.
//!
//! Defines the request/response contract with the remote chat backend.

use crate::error::Result;
use crate::session::{Session, SessionDetail, SessionId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of a send request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Trimmed user text
    pub message: String,
    /// Target session, or `None` to let the backend open a new one
    pub session_id: Option<SessionId>,
}

/// Reply to a send request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// Assistant reply text
    #[serde(alias = "response")]
    pub content: String,
    /// Session the exchange was stored in (newly issued when none was sent)
    pub session_id: SessionId,
    /// Backend processing time in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
}

/// An abstract gateway to the conversational backend.
///
/// This trait decouples the session controller from the transport used to
/// reach the backend (HTTP, an in-process fake, ...).
///
/// # Implementation Notes
///
/// - Any non-success answer must be reported as an `Err`, never as an empty
///   value.
/// - Implementations carry their own credentials; the controller never sees
///   them.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Lists the user's sessions, most recent first as ordered by the backend.
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Fetches one session with its full transcript.
    async fn get_session(&self, session_id: &SessionId) -> Result<SessionDetail>;

    /// Posts a user message and returns the assistant reply.
    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse>;

    /// Deletes a session.
    async fn delete_session(&self, session_id: &SessionId) -> Result<()>;

    /// Lists suggested prompts.
    async fn list_suggestions(&self) -> Result<Vec<String>>;
}
