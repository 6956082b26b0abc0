//! Domain-level error types for chatgpt-export.
//!
//! All errors are typed with `thiserror` and carry enough text for the
//! user to know the remedy (re-authenticate, retry later, etc.).

use thiserror::Error;

/// Export pipeline errors.
///
/// Errors hit while listing, authenticating, or touching the archive file
/// abort the whole run; errors fetching a single conversation are caught by
/// the orchestrator and recorded in the archive's `errors` array instead.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Missing, expired, or rejected credential.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The backend answered 429.
    #[error("The server rate-limited the export. Wait a few minutes and try again.")]
    RateLimited,

    /// Non-success HTTP status other than 401/429.
    #[error("API error {status} on {path}")]
    Api { status: u16, path: String },

    /// Connection-level failure before any HTTP status was produced.
    #[error("Network error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The account has nothing to export.
    #[error("No conversations found.")]
    NoConversations,

    /// A second export was started while one is active.
    #[error("An export is already running. Cancel it before starting another.")]
    AlreadyRunning,

    /// Failure writing or reading the temporary archive, or delivering
    /// the finished file.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The backend returned a body we could not decode, or a record
    /// could not be serialized.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ExportError {
    /// Create a transport error from a reqwest error.
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a storage error with context.
    pub fn storage(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create an invalid-response error from a serde error.
    pub fn invalid_response(err: serde_json::Error) -> Self {
        Self::InvalidResponse {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias using `ExportError`.
pub type Result<T> = std::result::Result<T, ExportError>;
