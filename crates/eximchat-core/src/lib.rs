//! Domain layer for EximChat.
//!
//! Holds the conversation types, the transcript reducer and the traits the
//! other crates implement (`ChatGateway`, `AuthStore`).

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;

// Re-export common error type
pub use error::ChatError;
pub use gateway::{ChatGateway, SendMessageRequest, SendMessageResponse};
