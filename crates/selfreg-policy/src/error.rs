//! Infrastructure errors.
//!
//! These are never expressed as a [`ValidationOutcome`](crate::ValidationOutcome);
//! they mean the policy could not reach a decision.

use thiserror::Error;

/// Errors raised by collaborators while evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Tenant domain is not known to the system.
    #[error("invalid tenant domain: {0}")]
    InvalidTenant(String),

    /// A qualified username names a user store that does not exist.
    #[error("unknown user store '{domain}' in tenant '{tenant}'")]
    UnknownUserStore { tenant: String, domain: String },

    /// User-store lookup failed.
    #[error("user store lookup failed: {0}")]
    UserStore(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
