//! Services the policy consults.
//!
//! Implementations must be thread-safe; the policy shares them across
//! concurrent evaluations and never caches their answers.

use crate::error::PolicyResult;

/// Self-registration and account lookups for a tenant.
pub trait SelfRegistrationStatus: Send + Sync {
    fn is_self_registration_enabled(&self, tenant_domain: &str) -> PolicyResult<bool>;

    /// Whether an account exists for `qualified_username` (`DOMAIN/name`, or
    /// bare for the primary store).
    fn is_username_already_taken(
        &self,
        qualified_username: &str,
        tenant_domain: &str,
    ) -> PolicyResult<bool>;

    /// Whether `qualified_username` (`DOMAIN/name`, or bare for the primary
    /// store) matches the username pattern of its user store.
    fn is_match_username_regex(
        &self,
        tenant_domain: &str,
        qualified_username: &str,
    ) -> PolicyResult<bool>;

    fn is_valid_tenant_domain(&self, tenant_domain: &str) -> PolicyResult<bool>;
}

/// Per-user-store configuration lookups.
pub trait UserStoreDirectory: Send + Sync {
    /// Configured regex violation message for a user store, `None` if unset.
    fn regex_violation_message(
        &self,
        tenant_domain: &str,
        domain: &str,
    ) -> PolicyResult<Option<String>>;
}

/// Name-to-domain resolution.
pub trait DomainResolver: Send + Sync {
    /// Domain prefix of a `DOMAIN/name` username.
    fn extract_domain_from_name(&self, username: &str) -> Option<String>;

    fn primary_domain_name(&self) -> String;
}
