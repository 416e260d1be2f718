//! Conversation session controller.
//!
//! `ChatController` owns the session list, the active conversation, the
//! suggestion list and the loading/sending/error flags. It talks to the
//! backend only through `ChatGateway` and publishes every state change on a
//! `watch` channel.
//!
//! # Failure handling
//!
//! Gateway failures never escape an operation. They end up in
//! `ChatState::last_error` (or only in the log, for the initial load), and the
//! state is left as it was before the operation, apart from the optimistic
//! message of a failed send which is rolled back.

use crate::state::ChatState;
use eximchat_core::gateway::{ChatGateway, SendMessageRequest};
use eximchat_core::session::{Attempt, ChatMessage, Session, SessionId};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const SEND_FAILED: &str = "Failed to send message";
pub const LOAD_FAILED: &str = "Failed to load conversation";
pub const DELETE_FAILED: &str = "Failed to delete conversation";
const SEND_CANCELLED: &str = "Send cancelled";

/// Result of [`ChatController::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Empty text, or another send was in flight. Nothing changed.
    Ignored,
    /// The assistant reply was appended.
    Delivered,
    /// The send failed and was rolled back; carries the error shown to the user.
    Failed(String),
}

/// Client-side state machine for the chat assistant.
///
/// Cloning is cheap; clones share state and gateway.
#[derive(Clone)]
pub struct ChatController {
    gateway: Arc<dyn ChatGateway>,
    state: Arc<watch::Sender<ChatState>>,
    /// Session-list refreshes spawned after a send opened a new session
    background: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ChatController {
    /// Creates a controller with empty state.
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        let (state, _) = watch::channel(ChatState::default());
        Self {
            gateway,
            state: Arc::new(state),
            background: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    ///
    /// The receiver is notified after every mutation, including transcript
    /// appends, which is what a view uses to keep the latest message in sight.
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    /// Loads sessions and suggestions concurrently.
    ///
    /// Each request fills its own slice as soon as it completes. Failures are
    /// logged and leave the slice empty; `last_error` is not touched.
    /// `initializing` is cleared even if the returned future is dropped.
    pub async fn initialize(&self) {
        tracing::debug!("[ChatController] initialize() called");
        self.state.send_modify(|s| s.initializing = true);
        let _loading = InitializingGuard(&self.state);

        let sessions = async {
            match self.gateway.list_sessions().await {
                Ok(sessions) => {
                    tracing::debug!("[ChatController] Loaded {} sessions", sessions.len());
                    self.state.send_modify(|s| s.sessions = sessions);
                }
                Err(e) => tracing::warn!("[ChatController] Failed to load sessions: {}", e),
            }
        };
        let suggestions = async {
            match self.gateway.list_suggestions().await {
                Ok(suggestions) => {
                    tracing::debug!(
                        "[ChatController] Loaded {} suggestions",
                        suggestions.len()
                    );
                    self.state.send_modify(|s| s.suggestions = suggestions);
                }
                Err(e) => tracing::warn!("[ChatController] Failed to load suggestions: {}", e),
            }
        };
        tokio::join!(sessions, suggestions);
    }

    /// Opens a stored session.
    ///
    /// On success the session and its transcript replace the current ones in a
    /// single update. On failure only `last_error` changes.
    pub async fn select_session(&self, session_id: &SessionId) {
        tracing::debug!("[ChatController] select_session({})", session_id);

        match self.gateway.get_session(session_id).await {
            Ok(detail) => {
                tracing::info!(
                    "[ChatController] Opened session {} ({} messages)",
                    detail.session.id,
                    detail.messages.len()
                );
                self.state
                    .send_modify(|s| s.open_conversation(detail.session, detail.messages));
            }
            Err(e) => {
                tracing::warn!("[ChatController] Failed to open session {}: {}", session_id, e);
                let message = e.user_message_or(LOAD_FAILED);
                self.state.send_modify(|s| s.last_error = Some(message));
            }
        }
    }

    /// Starts a new, unsaved conversation. No network call.
    pub fn new_chat(&self) {
        tracing::debug!("[ChatController] new_chat()");
        self.state.send_modify(ChatState::reset_conversation);
    }

    /// Sends a user message.
    ///
    /// Ignored when the trimmed text is empty or another send is in flight.
    /// Otherwise the user message is shown immediately; the assistant reply is
    /// appended on success, and the user message is removed again on failure.
    /// `sending` is cleared on every path, including cancellation of the
    /// returned future.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let mut target: Option<SessionId> = None;
        let mut epoch = 0;
        let accepted = self.state.send_if_modified(|s| {
            if s.sending || !s.transcript.begin(ChatMessage::user(text)) {
                return false;
            }
            s.sending = true;
            s.last_error = None;
            target = s.current_session.as_ref().map(|c| c.id.clone());
            epoch = s.conversation_epoch;
            true
        });
        if !accepted {
            tracing::debug!("[ChatController] send_message ignored: send already in flight");
            return SendOutcome::Ignored;
        }

        let guard = SendGuard::new(self.state.clone());
        let opens_session = target.is_none();
        let result = self
            .gateway
            .send_message(SendMessageRequest {
                message: text.to_string(),
                session_id: target,
            })
            .await;

        match result {
            Ok(reply) => {
                tracing::info!(
                    "[ChatController] Reply received for session {} ({:?}s)",
                    reply.session_id,
                    reply.response_time
                );
                let issued = reply.session_id;
                let assistant = ChatMessage::assistant(reply.content, reply.response_time);
                guard.settle(|s| {
                    s.transcript.settle(Attempt::Success(assistant));
                    // The user may have switched conversations meanwhile
                    if s.conversation_epoch == epoch && s.current_session.is_none() {
                        s.current_session = Some(Session::stub(issued));
                    }
                });
                if opens_session {
                    self.spawn_session_refresh();
                }
                SendOutcome::Delivered
            }
            Err(e) => {
                tracing::warn!("[ChatController] Send failed: {}", e);
                let message = e.user_message_or(SEND_FAILED);
                let shown = message.clone();
                guard.settle(|s| {
                    s.transcript.settle(Attempt::Failure(message.clone()));
                    s.last_error = Some(message);
                });
                SendOutcome::Failed(shown)
            }
        }
    }

    /// Deletes a session.
    ///
    /// On success the session leaves the list; if it was the active one the
    /// conversation is reset as by [`ChatController::new_chat`]. On failure only
    /// `last_error` changes.
    pub async fn delete_session(&self, session_id: &SessionId) {
        tracing::debug!("[ChatController] delete_session({})", session_id);

        match self.gateway.delete_session(session_id).await {
            Ok(()) => {
                tracing::info!("[ChatController] Deleted session {}", session_id);
                self.state.send_modify(|s| {
                    if let Some(pos) = s.sessions.iter().position(|x| &x.id == session_id) {
                        s.sessions.remove(pos);
                    }
                    let was_current = s
                        .current_session
                        .as_ref()
                        .is_some_and(|c| &c.id == session_id);
                    if was_current {
                        s.reset_conversation();
                    }
                });
            }
            Err(e) => {
                tracing::warn!(
                    "[ChatController] Failed to delete session {}: {}",
                    session_id,
                    e
                );
                let message = e.user_message_or(DELETE_FAILED);
                self.state.send_modify(|s| s.last_error = Some(message));
            }
        }
    }

    /// Re-fetches the session list. Failures are only logged.
    pub async fn refresh_sessions(&self) {
        match self.gateway.list_sessions().await {
            Ok(sessions) => {
                tracing::debug!("[ChatController] Refreshed {} sessions", sessions.len());
                self.state.send_modify(|s| s.sessions = sessions);
            }
            Err(e) => tracing::warn!("[ChatController] Failed to refresh sessions: {}", e),
        }
    }

    /// Dismisses the last error.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    /// Waits for background refreshes spawned so far.
    pub async fn wait_background(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut background = self.background.lock().unwrap_or_else(|e| e.into_inner());
            background.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("[ChatController] Background refresh aborted: {}", e);
            }
        }
    }

    fn spawn_session_refresh(&self) {
        let controller = self.clone();
        let handle = tokio::spawn(async move { controller.refresh_sessions().await });

        let mut background = self.background.lock().unwrap_or_else(|e| e.into_inner());
        background.retain(|h| !h.is_finished());
        background.push(handle);
    }
}

/// Clears `initializing` when the initial load ends or is dropped.
struct InitializingGuard<'a>(&'a watch::Sender<ChatState>);

impl Drop for InitializingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|s| s.initializing = false);
    }
}

/// Clears `sending` when a send settles or its future is dropped.
struct SendGuard {
    state: Option<Arc<watch::Sender<ChatState>>>,
}

impl SendGuard {
    fn new(state: Arc<watch::Sender<ChatState>>) -> Self {
        Self { state: Some(state) }
    }

    /// Applies the settled outcome and clears `sending` in the same update.
    fn settle<F>(mut self, apply: F)
    where
        F: FnOnce(&mut ChatState),
    {
        if let Some(state) = self.state.take() {
            state.send_modify(|s| {
                apply(s);
                s.sending = false;
            });
        }
    }
}

impl Drop for SendGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::debug!("[ChatController] Send dropped before settling, rolling back");
            state.send_modify(|s| {
                s.transcript
                    .settle(Attempt::Failure(SEND_CANCELLED.to_string()));
                s.sending = false;
            });
        }
    }
}
