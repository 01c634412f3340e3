//! Blocking HTTP executor for built requests.
//!
//! # Design
//! One attempt per call, no retries, no backoff. Status-code handling is
//! disabled in ureq (`http_status_as_error(false)`) so 4xx/5xx responses
//! flow back as data and the parse layer owns status interpretation.
//! Connection and read failures surface as `SocialError::Transport`.

use std::time::Duration;

use crate::error::SocialError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Timeout applied to each HTTP request.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes `HttpRequest` values over the network using ureq.
#[derive(Debug, Clone)]
pub struct Transport {
    agent: ureq::Agent,
}

impl Transport {
    pub fn new() -> Self {
        Self::with_timeout(HTTP_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    /// Perform the round-trip and return the response as plain data.
    pub fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, SocialError> {
        let result = match (&req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&req.path);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Delete, _) => {
                let mut builder = self.agent.delete(&req.path);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post, body) => {
                let mut builder = self.agent.post(&req.path);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            (HttpMethod::Put, body) => {
                let mut builder = self.agent.put(&req.path);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| SocialError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SocialError::Transport(e.to_string()))?;
        tracing::debug!(method = ?req.method, url = %req.path, status, "http round trip");

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
