//! Transcript reducer.
//!
//! The transcript only changes through three steps: [`Transcript::begin`]
//! appends the optimistic user message, [`Transcript::settle`] either appends
//! the confirmed reply or truncates back to the length recorded at `begin`.
//! The rollback is therefore exact by construction.

use super::attempt::Attempt;
use super::message::ChatMessage;

/// Ordered messages of the active session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    /// Length before the open attempt's optimistic append.
    open_attempt: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole transcript, e.g. after switching sessions.
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            open_attempt: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Whether an optimistic message is waiting to be settled.
    pub fn has_open_attempt(&self) -> bool {
        self.open_attempt.is_some()
    }

    /// Appends an optimistic message and opens an attempt.
    ///
    /// Returns `false` and leaves the transcript untouched if another attempt
    /// is still open.
    pub fn begin(&mut self, optimistic: ChatMessage) -> bool {
        if self.open_attempt.is_some() {
            return false;
        }
        self.open_attempt = Some(self.messages.len());
        self.messages.push(optimistic);
        true
    }

    /// Settles the open attempt.
    ///
    /// `Pending` keeps the attempt open. `Success` appends the confirmed
    /// message. `Failure` truncates to the pre-attempt length. Settling with no
    /// open attempt is a no-op.
    pub fn settle(&mut self, attempt: Attempt<ChatMessage>) {
        let Some(base_len) = self.open_attempt else {
            return;
        };
        match attempt {
            Attempt::Pending => {}
            Attempt::Success(reply) => {
                self.messages.push(reply);
                self.open_attempt = None;
            }
            Attempt::Failure(_) => {
                self.messages.truncate(base_len);
                self.open_attempt = None;
            }
        }
    }
}
