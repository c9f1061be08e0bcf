use thiserror::Error;

/// Unified error type for gat operations
#[derive(Error, Debug)]
pub enum GatError {
    /// A tag name that is not a semantic version. Callers skip it.
    #[error("Malformed tag: {0}")]
    MalformedTag(String),

    #[error("Cannot resolve current version: {0}")]
    Resolution(String),

    #[error("Tag creation failed: {0}")]
    TagCreation(String),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in gat
pub type Result<T> = std::result::Result<T, GatError>;

impl GatError {
    pub fn malformed_tag(msg: impl Into<String>) -> Self {
        GatError::MalformedTag(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        GatError::Resolution(msg.into())
    }

    pub fn tag_creation(msg: impl Into<String>) -> Self {
        GatError::TagCreation(msg.into())
    }

    pub fn push(msg: impl Into<String>) -> Self {
        GatError::Push(msg.into())
    }

    pub fn credential(msg: impl Into<String>) -> Self {
        GatError::Credential(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        GatError::Config(msg.into())
    }

    /// Only malformed tags are skipped; everything else aborts the invocation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GatError::MalformedTag(_))
    }
}
