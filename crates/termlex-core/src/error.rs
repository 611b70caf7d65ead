use thiserror::Error;

/// Core error types for termlex operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid value set OID: {0}")]
    InvalidOid(String),

    #[error("Invalid value set document: {message}")]
    InvalidDocument { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidOid error
    pub fn invalid_oid(oid: impl Into<String>) -> Self {
        Self::InvalidOid(oid.into())
    }

    /// Create a new InvalidDocument error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Validates a value set OID (dotted decimal, e.g. `2.16.840.1.113762.1.4.1223.9`).
pub fn validate_oid(oid: &str) -> Result<()> {
    let valid = !oid.is_empty()
        && oid
            .split('.')
            .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(CoreError::invalid_oid(oid))
    }
}
