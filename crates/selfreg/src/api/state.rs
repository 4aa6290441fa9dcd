//! Application state shared across handlers.

use selfreg_policy::UsernameValidationPolicy;

#[derive(Clone, Debug)]
pub struct AppState {
    pub policy: UsernameValidationPolicy,
    /// Tenant used by the unscoped route.
    pub default_tenant: String,
}

impl AppState {
    pub fn new(policy: UsernameValidationPolicy, default_tenant: impl Into<String>) -> Self {
        Self {
            policy,
            default_tenant: default_tenant.into(),
        }
    }
}
