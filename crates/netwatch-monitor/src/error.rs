use thiserror::Error;

/// Errors a snapshot provider may report.
///
/// Neither variant is fatal to the monitor loop: a single failed call
/// degrades that portion of the snapshot to empty, and a cycle where both
/// calls fail is skipped entirely.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for ProviderError {
    fn from(e: std::io::Error) -> Self {
        ProviderError::Unavailable(e.to_string())
    }
}

/// Convenience type alias for provider results.
pub type ProviderResult<T> = Result<T, ProviderError>;
