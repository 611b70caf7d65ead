//! Error types for terminology resolution

use termlex_auth::AuthError;
use termlex_core::CoreError;
use thiserror::Error;

/// Result type for terminology operations
pub type TerminologyResult<T> = std::result::Result<T, TerminologyError>;

/// Errors that can occur during value-set resolution and concept expansion
#[derive(Debug, Error)]
pub enum TerminologyError {
    /// Invalid OID or malformed document
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Ticket-granting authentication failure; fatal for the call in progress
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Value-set source request failed
    #[error("Value set source request failed for {oid}: {source}")]
    ValueSetSource {
        oid: String,
        #[source]
        source: reqwest::Error,
    },

    /// Concept service request failed
    #[error("Concept service request failed: {0}")]
    ConceptSource(#[source] reqwest::Error),
}

impl TerminologyError {
    pub fn value_set_source(oid: impl Into<String>, source: reqwest::Error) -> Self {
        Self::ValueSetSource {
            oid: oid.into(),
            source,
        }
    }

    /// Authentication failures abort a whole resolution; everything else is
    /// recovered locally by skipping the affected element or branch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
