use thiserror::Error;

/// Document store error taxonomy.
///
/// Conflicts and not-found conditions are client errors and never retried.
/// I/O failures are server-side, logged with context by the caller.
/// Configuration errors are fatal at startup.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("document already exists")]
    AlreadyExists,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("invalid year: {0}")]
    InvalidYear(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("metadata encoding failed")]
    Meta(#[from] serde_json::Error),
    #[error("storage I/O failure")]
    Io(#[from] std::io::Error),
}

impl DocError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DocError::AlreadyExists)
    }
}
