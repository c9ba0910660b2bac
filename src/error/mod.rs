//! Error types for aggctl.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Configuration**: missing/invalid persisted configuration. Fatal,
//!   printed, process exits non-zero.
//! - **Authentication**: credential rejected or auth endpoint unreachable.
//!   Fatal for the operation attempted; the token cache is left unchanged.
//! - **Request**: non-2xx or transport failure on a data call. Carries the
//!   URL, status, and a truncated body snippet so the failure can be
//!   diagnosed without re-running with verbose logging.
//! - **Unsupported**: an operation requested against an instance kind that
//!   does not support it.
//!
//! No layer retries a failed call, and no failure is silently swallowed
//! except the documented soft-fail in private-token acquisition.

use thiserror::Error;

/// Maximum number of response-body bytes carried in a request error.
pub const BODY_SNIPPET_LEN: usize = 200;

/// Truncate a response body to the diagnostic snippet length.
#[must_use]
pub fn body_snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        body.to_string()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes for CLI paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure (network error, backend rejection)
    GeneralError = 1,
    /// Configuration or usage error
    ConfigError = 2,
    /// Credential rejected or auth endpoint unreachable
    AuthError = 3,
    /// Request deadline exceeded
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

// =============================================================================
// Error Type
// =============================================================================

/// Main error type for aggctl operations.
#[derive(Error, Debug)]
pub enum AggctlError {
    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Configuration file not found at the expected path.
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Error parsing the configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Configuration fails required-field validation or is otherwise invalid.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Authentication errors
    // ==========================================================================
    /// The auth endpoint rejected the credentials or returned non-2xx.
    #[error("authentication failed (HTTP {status}) at {url}: {body}")]
    AuthRejected { url: String, status: u16, body: String },

    /// The auth endpoint could not be reached.
    #[error("authentication request to {url} failed: {message}")]
    AuthTransport { url: String, message: String },

    // ==========================================================================
    // Request errors
    // ==========================================================================
    /// A data endpoint returned a non-2xx status.
    #[error("request failed (HTTP {status}) at {url}: {body}")]
    RequestStatus { url: String, status: u16, body: String },

    /// Transport-level failure on a data call.
    #[error("request to {url} failed: {message}")]
    RequestTransport { url: String, message: String },

    /// Request deadline exceeded.
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    // ==========================================================================
    // Other
    // ==========================================================================
    /// Operation requested against an instance kind that does not support it.
    #[error("{operation} is not supported for {kind} instances")]
    Unsupported {
        operation: &'static str,
        kind: &'static str,
    },

    /// I/O failure (config file reads, CSV writes).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure on the output path.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Unclassified failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AggctlError {
    /// HTTP status carried by this error, when one applies.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthRejected { status, .. } | Self::RequestStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Map this error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::Config(_)
            | Self::Unsupported { .. } => ExitCode::ConfigError,
            Self::AuthRejected { .. } | Self::AuthTransport { .. } => ExitCode::AuthError,
            Self::Timeout { .. } => ExitCode::Timeout,
            _ => ExitCode::GeneralError,
        }
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, AggctlError>;
