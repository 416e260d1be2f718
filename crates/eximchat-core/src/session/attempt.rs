//! Outcome of an optimistic request.

/// State of a request whose effect was shown before the server confirmed it.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    /// Still waiting for the server.
    Pending,
    /// The server confirmed and returned a value.
    Success(T),
    /// The server (or the network) rejected the request.
    Failure(String),
}
