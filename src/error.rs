use thiserror::Error;

/// Unified error type for release-tools operations
#[derive(Error, Debug)]
pub enum ReleaseToolsError {
    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Git log parsing error: {0}")]
    GitLog(String),
}

/// Convenience type alias for Results in release-tools
pub type Result<T> = std::result::Result<T, ReleaseToolsError>;

impl ReleaseToolsError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseToolsError::Version(msg.into())
    }

    /// Create a git log error with context
    pub fn git_log(msg: impl Into<String>) -> Self {
        ReleaseToolsError::GitLog(msg.into())
    }
}
