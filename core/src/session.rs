//! Login screen state machine.
//!
//! # Design
//! `Idle -> Pending -> {Failed, Redirected}`. The round-trip is split the
//! same way as `TodoClient`: `begin_submit` hands out the single request to
//! send and moves to `Pending`; `complete` consumes the outcome and always
//! leaves `Pending`. While pending, `begin_submit` returns `None` and the
//! credential fields refuse edits, which is what a disabled form does.

use std::fmt;

use tracing::{debug, info, warn};

use crate::client::TodoClient;
use crate::error::{AuthError, TransportError, INVALID_CREDENTIALS};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::Credentials;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Pending,
    /// Back to idle, with the message to show above the form.
    Failed(String),
    Redirected,
}

/// Screens the front end can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Todos,
}

/// Where to go after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Screen,
}

pub struct Session {
    client: TodoClient,
    username: String,
    password: String,
    state: SessionState,
}

impl Session {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            username: String::new(),
            password: String::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SessionState::Pending
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_pending() {
            "Loading..."
        } else {
            "Login"
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `false` and leaves the field alone while a request is pending.
    pub fn set_username(&mut self, username: impl Into<String>) -> bool {
        if self.is_pending() {
            return false;
        }
        self.username = username.into();
        true
    }

    /// Returns `false` and leaves the field alone while a request is pending.
    pub fn set_password(&mut self, password: impl Into<String>) -> bool {
        if self.is_pending() {
            return false;
        }
        self.password = password.into();
        true
    }

    /// Start a login attempt. Returns the request to send, or `None` when a
    /// request is already in flight or the user has been redirected.
    ///
    /// The entered credentials move into the request and the fields are
    /// cleared.
    pub fn begin_submit(&mut self) -> Option<HttpRequest> {
        self.start().ok()
    }

    fn start(&mut self) -> Result<HttpRequest, AuthError> {
        match self.state {
            SessionState::Pending => return Err(AuthError::InFlight),
            SessionState::Redirected => return Err(AuthError::AlreadySignedIn),
            SessionState::Idle | SessionState::Failed(_) => {}
        }

        let credentials = Credentials {
            username: std::mem::take(&mut self.username),
            password: std::mem::take(&mut self.password),
        };
        match self.client.build_login(&credentials) {
            Ok(request) => {
                info!(username = %credentials.username, "submitting login");
                self.state = SessionState::Pending;
                Ok(request)
            }
            Err(err) => {
                warn!(error = %err, "could not build login request");
                self.state = SessionState::Failed(INVALID_CREDENTIALS.to_string());
                Err(AuthError::Rejected(err))
            }
        }
    }

    /// Finish the in-flight login attempt with whatever the transport
    /// returned. Always leaves `Pending`.
    pub fn complete(
        &mut self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Redirect, AuthError> {
        if !self.is_pending() {
            return Err(AuthError::NotPending);
        }

        let result = match outcome {
            Ok(response) => self.client.parse_login(response).map_err(AuthError::Rejected),
            Err(err) => Err(AuthError::Unreachable(err)),
        };

        match result {
            Ok(body) => {
                debug!(%body, "login response");
                self.state = SessionState::Redirected;
                Ok(Redirect { to: Screen::Todos })
            }
            Err(err) => {
                info!(error = %err, "login failed");
                let message = err.user_message().unwrap_or(INVALID_CREDENTIALS);
                self.state = SessionState::Failed(message.to_string());
                Err(err)
            }
        }
    }

    /// Run a full login round-trip over `transport`.
    pub fn submit_credentials<T: Transport>(&mut self, transport: &T) -> Result<Redirect, AuthError> {
        let request = self.start()?;
        self.complete(transport.execute(&request))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.client)
            .field("username", &self.username)
            .field("password", &"***")
            .field("state", &self.state)
            .finish()
    }
}
