use thiserror::Error;

/// Failure taxonomy for booking, billing and invoice operations.
///
/// Storage variants are deliberately separate from database ones: a blob
/// store failure after a booking write must downgrade to "saved without
/// invoice" at the handler boundary, while a database failure aborts the
/// request.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("billing computation failed: {0}")]
    Computation(String),

    #[error("storage authorization failed: {0}")]
    StorageAuth(String),

    #[error("no shareable link available for {0}")]
    LinkUnavailable(String),

    #[error("storage rate limit hit, retry later")]
    RateLimited,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("storage request failed: {0}")]
    Storage(String),

    #[error("receipt upload failed for: {}", failed.join(", "))]
    Attachments { failed: Vec<String> },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("external service error: {0}")]
    External(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
