//! Domain DTOs for the login and todo endpoints.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. `TodoId` is
//! opaque: the service may hand out strings or integers and the client only
//! ever echoes them back in request paths.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned identifier of a todo item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => TodoId(s),
            Raw::Signed(n) => TodoId(n.to_string()),
            Raw::Unsigned(n) => TodoId(n.to_string()),
        })
    }
}

/// A single todo item as returned by `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub task: String,
    pub due_date: String,
    pub completed: bool,
}

/// Body of a create or update request. The id is never part of the body;
/// updates carry it in the path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPayload {
    pub task: String,
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Whatever the login endpoint answered with on success. Only logged.
pub type LoginResponse = serde_json::Value;
