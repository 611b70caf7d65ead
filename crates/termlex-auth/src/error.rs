use thiserror::Error;

/// Errors raised by the ticket-granting flow.
///
/// All of these are fatal for the call in progress; nothing here is retried
/// silently.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to acquire grant ticket: {0}")]
    GrantRequest(#[source] reqwest::Error),

    #[error("Grant ticket response is malformed, double-check credentials")]
    MalformedGrant,

    #[error("Failed to acquire single-use service ticket: {0}")]
    ServiceTicketRequest(#[source] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Convenience result type for authentication operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;
