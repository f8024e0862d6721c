//! Stateless HTTP request builder and response parser for the todo service.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the client
//! deterministic and free of I/O dependencies.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, LoginResponse, TodoId, TodoItem, TodoPayload};

/// Characters escaped when an id is placed into a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless client for the login and todo endpoints.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/login", self.base_url), credentials)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &TodoPayload) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/todos", self.base_url), input)
    }

    pub fn build_update_todo(&self, id: &TodoId, input: &TodoPayload) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, self.item_path(id), input)
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Success is decided by status alone. The body is opaque: JSON is kept
    /// as JSON, anything else as a plain string.
    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(LoginResponse::Null);
        }
        Ok(serde_json::from_str(&response.body).unwrap_or(LoginResponse::String(response.body)))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        Ok(())
    }

    /// Status-only check for create/update replies whose body is not needed.
    pub fn parse_mutation_status(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn item_path(&self, id: &TodoId) -> String {
        format!("{}/todos/{}", self.base_url, utf8_percent_encode(id.as_str(), SEGMENT))
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
}
