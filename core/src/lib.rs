//! Client core for the todo service: login plus list/create/update/delete.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). On top of it sit the
//! two screens of the app: `Session` (login) and `ListManager` (the todo
//! list and its create/edit form). Both reach the network only through the
//! `Transport` trait, which the host implements.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - `ListManager` never patches its list locally: every mutation is followed
//!   by a full refetch.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod list;
pub mod render;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::TodoClient;
pub use error::{
    ApiError, AuthError, FetchError, MutationError, MutationKind, TransportError, ValidationError,
    INVALID_CREDENTIALS,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use list::{FormMode, ListManager, Notice, SyncOutcome, TodoForm, MAX_NOTICES};
pub use render::{format_due_date, format_due_date_in, render_rows, render_rows_in, TodoRow};
pub use session::{Redirect, Screen, Session, SessionState};
pub use types::{Credentials, LoginResponse, TodoId, TodoItem, TodoPayload};

/// Default address of the todo service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
