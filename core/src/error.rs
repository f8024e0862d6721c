//! Error types for the todo client.
//!
//! # Design
//! `ApiError` is the protocol-level error produced by `TodoClient` parse
//! methods. The component-level errors wrap it: `AuthError` for the login
//! screen, `FetchError` for list reads and `MutationError` for
//! create/update/delete. Only `AuthError` is shown to the user, and always as
//! the same static message; the others are logged and turned into notices.

use std::fmt;

use thiserror::Error;

/// Message shown for every login failure, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// The request never produced an HTTP response (connect failure, reset, ...).
#[derive(Debug, Clone, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A failed login attempt. The variants keep the cause for diagnostics, but
/// `user_message` collapses the failed round-trips to one string.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service answered with a non-2xx status or an unreadable body.
    #[error("login rejected: {0}")]
    Rejected(#[source] ApiError),

    /// The service could not be reached.
    #[error("login service unreachable: {0}")]
    Unreachable(#[source] TransportError),

    /// A login request is already in flight.
    #[error("a login request is already pending")]
    InFlight,

    #[error("already signed in")]
    AlreadySignedIn,

    /// `complete` was called with no login request in flight.
    #[error("no login request is pending")]
    NotPending,
}

impl AuthError {
    /// The text shown on the login screen, or `None` for call-order misuse
    /// that never reached the service.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            AuthError::Rejected(_) | AuthError::Unreachable(_) => Some(INVALID_CREDENTIALS),
            AuthError::InFlight | AuthError::AlreadySignedIn | AuthError::NotPending => None,
        }
    }
}

/// Reading the full list failed.
#[derive(Debug, Error)]
#[error("failed to fetch todos: {0}")]
pub struct FetchError(#[source] pub ApiError);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// A create, update or delete request failed.
#[derive(Debug, Error)]
#[error("failed to {kind} todo: {source}")]
pub struct MutationError {
    pub kind: MutationKind,
    #[source]
    pub source: ApiError,
}

/// Local form validation. Task text is the only required field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task text is required")]
    TaskRequired,
}
