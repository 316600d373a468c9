//! Unified error handling for the Samurai client
//!
//! Every fallible operation of the client returns [`SamuraiError`]. Remote
//! failures keep the wire-level status code and status string so callers can
//! still inspect what the service (or the transport) reported.

use std::path::PathBuf;
use thiserror::Error;

/// Main client error type
#[derive(Error, Debug)]
pub enum SamuraiError {
    // ==================== Input Errors ====================
    /// The cleaned input could not be classified as a telephone number.
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    // ==================== Remote Errors ====================
    #[error("Transport failure {code}: {message}")]
    Transport { code: i64, message: String },

    #[error("Remote fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Unexpected status {code}: {message}")]
    Status { code: i64, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ==================== Local Errors ====================
    #[error("Cannot read {}: {source}", path.display())]
    ResourceAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Card parse error: {0}")]
    Card(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SamuraiError {
    /// Wire-level status code, when the error came from an RPC response
    pub fn status_code(&self) -> Option<i64> {
        match self {
            SamuraiError::Transport { code, .. }
            | SamuraiError::Fault { code, .. }
            | SamuraiError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the failure happened on the remote side or on the way to it
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SamuraiError::Transport { .. }
                | SamuraiError::Fault { .. }
                | SamuraiError::Status { .. }
                | SamuraiError::MalformedResponse(_)
        )
    }
}

impl From<config::ConfigError> for SamuraiError {
    fn from(err: config::ConfigError) -> Self {
        SamuraiError::Config(err.to_string())
    }
}
