//! Daemon error types.

use thiserror::Error;

/// Errors raised while wiring the daemon together.
///
/// Provider failures are deliberately absent: once the monitor is running,
/// those degrade silently inside the loop and never terminate the process.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<config::ConfigError> for DaemonError {
    fn from(e: config::ConfigError) -> Self {
        DaemonError::Config(e.to_string())
    }
}

/// Convenience type alias for daemon results.
pub type DaemonResult<T> = Result<T, DaemonError>;
