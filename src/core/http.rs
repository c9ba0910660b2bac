//! HTTP client construction and failure classification.
//!
//! All network calls go through clients built here so the timeout classes
//! and the TLS verification switch are applied in exactly one place.
//! There is no retry logic anywhere: every call is attempted once and the
//! failure is surfaced to the caller.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};

use crate::error::{body_snippet, AggctlError, Result};

/// Timeout for auth endpoints (Basic auth and the OIDC token exchange).
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for data reads (project lists, aggregates, history).
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for rebuild triggers, which the backend may hold open while it
/// schedules the batch.
pub const REBUILD_TIMEOUT: Duration = Duration::from_secs(60);

/// Build a configured HTTP client.
///
/// `verify_tls` is off for the target deployments (self-signed
/// certificates); passing `false` explicitly accepts invalid certs.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration, verify_tls: bool) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .danger_accept_invalid_certs(!verify_tls)
        .user_agent(format!("aggctl/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AggctlError::Config(format!("failed to build HTTP client: {e}")))
}

/// Classify a transport-level failure against the timeout class it ran
/// under.
#[must_use]
pub fn classify_transport(err: &reqwest::Error, url: &str, timeout: Duration) -> AggctlError {
    if err.is_timeout() {
        AggctlError::Timeout {
            url: url.to_string(),
            seconds: timeout.as_secs(),
        }
    } else {
        AggctlError::RequestTransport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Fail a non-2xx data response with the status and a body snippet.
///
/// # Errors
///
/// Returns `RequestStatus` when the response status is not a success.
pub async fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AggctlError::RequestStatus {
        url: url.to_string(),
        status: status.as_u16(),
        body: body_snippet(&body),
    })
}
