//! Ticket-granting authentication
//!
//! The concept service is protected by a two-tier CAS-style scheme: a
//! long-lived grant ticket is acquired with account credentials, then every
//! individual request exchanges the grant for a brand-new single-use service
//! ticket carried as a `ticket=` query parameter.
//!
//! [`TicketProvider`] owns the grant lifecycle (acquire, hold, refresh on
//! expiry) behind a mutex so concurrent workers never race to refresh, and
//! issues service tickets on demand. Service tickets are never cached;
//! each authenticated request gets its own.

pub mod error;
pub mod ticket;

pub use error::{AuthError, AuthResult};
pub use ticket::{Credentials, TicketProvider};
