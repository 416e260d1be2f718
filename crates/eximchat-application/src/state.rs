//! Controller state snapshot.

use eximchat_core::session::{ChatMessage, Session, Transcript};

/// Everything the presentation layer renders.
///
/// Snapshots are taken whole, so a `current_session` is never observed
/// without the transcript that belongs to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    /// Sessions as last listed by the backend
    pub sessions: Vec<Session>,
    /// Active session, `None` for a new unsaved conversation
    pub current_session: Option<Session>,
    /// Messages of the active conversation
    pub transcript: Transcript,
    /// Suggested prompts, fetched once at startup
    pub suggestions: Vec<String>,
    /// Initial load in progress
    pub initializing: bool,
    /// A send is in flight
    pub sending: bool,
    /// Message of the last failed action
    pub last_error: Option<String>,
    /// Bumped whenever the active conversation is replaced or reset.
    pub(crate) conversation_epoch: u64,
}

impl ChatState {
    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn is_current(&self, session: &Session) -> bool {
        self.current_session
            .as_ref()
            .is_some_and(|current| current.id == session.id)
    }

    /// Switches to a fetched conversation in one step.
    pub(crate) fn open_conversation(&mut self, session: Session, messages: Vec<ChatMessage>) {
        self.current_session = Some(session);
        self.transcript = Transcript::from_messages(messages);
        self.last_error = None;
        self.conversation_epoch += 1;
    }

    /// The `new_chat` effect.
    pub(crate) fn reset_conversation(&mut self) {
        self.current_session = None;
        self.transcript = Transcript::new();
        self.last_error = None;
        self.conversation_epoch += 1;
    }
}
