//! Blocking HTTP client for the review service.
//!
//! Uses ureq so the review worker thread can own the agent without an async
//! runtime. Status codes are handled here rather than by ureq so the service's
//! `{"detail": ...}` error bodies can be surfaced verbatim.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{HealthStatus, ReviewRequest, ReviewResult};

/// Message used when a failed response carries no `detail`.
pub const GENERIC_FAILURE: &str = "Failed to analyze code";

/// Errors from a call to the review service.
///
/// `Display` is the message shown to the user after the `Error: ` prefix.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Connection refused, DNS failure, timeout and similar.
    #[error("{message}")]
    Network { message: String },

    /// A 2xx response whose body could not be decoded.
    #[error("Failed to parse response: {message}")]
    Parse { message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Extracts the service's `detail` message from an error body.
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_owned())
}

/// Client bound to one service base URL.
pub struct ReviewClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ReviewClient {
    /// Creates a client for `base_url`. `timeout` of `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST {base}/review`.
    pub fn review(&self, request: &ReviewRequest) -> Result<ReviewResult, ApiError> {
        let url = format!("{}/review", self.base_url);
        debug!(url = %url, bytes = request.code.len(), "sending review request");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send_json(request)
            .map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.into_body().read_to_string().unwrap_or_default();
            let message = error_detail(&body);
            warn!(status, message = %message, "review request failed");
            return Err(ApiError::Status { status, message });
        }

        response
            .into_body()
            .read_json::<ReviewResult>()
            .map_err(|e| ApiError::Parse {
                message: e.to_string(),
            })
    }

    /// `GET {base}/`.
    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = format!("{}/", self.base_url);
        let response = self.agent.get(&url).call().map_err(|e| ApiError::Network {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: error_detail(&body),
            });
        }

        response
            .into_body()
            .read_json::<HealthStatus>()
            .map_err(|e| ApiError::Parse {
                message: e.to_string(),
            })
    }
}
