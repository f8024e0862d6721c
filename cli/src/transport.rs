//! Blocking HTTP transport backed by ureq.

use todo_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use tracing::trace;

/// Executes `HttpRequest`s with a shared ureq agent.
///
/// The agent is configured to return 4xx/5xx responses as data so that
/// status interpretation stays in the core.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&req.path), &req.headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&req.path), &req.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&req.path), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&req.path), &req.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&req.path), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&req.path), &req.headers).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;
        trace!(method = req.method.as_str(), path = %req.path, status, "response received");

        Ok(HttpResponse { status, headers, body })
    }
}
