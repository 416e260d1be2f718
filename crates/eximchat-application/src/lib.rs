//! Application layer for EximChat.
//!
//! This crate provides the conversation session controller that coordinates
//! the presentation layer with the chat gateway.

pub mod chat_controller;
pub mod state;

pub use chat_controller::{ChatController, SendOutcome};
pub use state::ChatState;
