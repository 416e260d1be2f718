//! Session domain module.
//!
//! This module contains the conversation domain models and the transcript
//! reducer used by the controller.
//!
//! # Module Structure
//!
//! - `id`: Opaque server-assigned identifier (`SessionId`)
//! - `model`: Session summary and detail (`Session`, `SessionDetail`)
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`)
//! - `attempt`: Optimistic request outcome (`Attempt`)
//! - `transcript`: Append / rollback reducer (`Transcript`)

mod attempt;
mod id;
mod message;
mod model;
mod transcript;

// Re-export public API
pub use attempt::Attempt;
pub use id::SessionId;
pub use message::{ChatMessage, MessageMetadata, MessageRole};
pub use model::{PLACEHOLDER_TITLE, Session, SessionDetail};
pub use transcript::Transcript;
