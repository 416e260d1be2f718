pub mod auth;
pub mod chat;
pub mod render;
pub mod send;
pub mod sessions;
