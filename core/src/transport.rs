//! The network seam between `PostApi` and the wire.
//!
//! # Design
//! A `Transport` turns an `HttpRequest` into an `HttpResponse`. Non-2xx
//! statuses are returned as data so `PostApi` stays in charge of status
//! interpretation; only failures that produce no response at all become
//! `ApiError::Transport`. Implementations are blocking; `PostClient` moves
//! them onto tokio's blocking pool.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `ureq::Agent`.
///
/// The agent has ureq's automatic status-code-as-error behavior disabled so
/// 4xx/5xx responses come back as `HttpResponse` values.
#[derive(Debug, Clone)]
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

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;
        let body = body.unwrap_or_default();

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(&path), &headers).send(body.as_bytes()),
            HttpMethod::Put => with_headers(self.agent.put(&path), &headers).send(body.as_bytes()),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
