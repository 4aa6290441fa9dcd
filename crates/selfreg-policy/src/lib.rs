//! Username validation policy for self sign-up.
//!
//! This crate holds the decision logic only. It is used by:
//! - The selfreg HTTP endpoint and CLI
//! - Unit tests with fake collaborators
//!
//! Tenant, user-store and registration lookups are reached through the
//! traits in [`collaborators`], so the policy itself performs no I/O.

pub mod collaborators;
pub mod domain;
pub mod error;
pub mod outcome;
pub mod policy;
pub mod request;

pub use collaborators::{DomainResolver, SelfRegistrationStatus, UserStoreDirectory};
pub use domain::{DOMAIN_SEPARATOR, DomainNames, qualify_username, strip_domain};
pub use error::{PolicyError, PolicyResult};
pub use outcome::{ErrorCode, ValidationOutcome};
pub use policy::UsernameValidationPolicy;
pub use request::{Property, REALM, SKIP_SIGN_UP_ENABLE_CHECK, ValidationRequest};
