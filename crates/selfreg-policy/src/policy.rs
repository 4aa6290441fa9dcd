//! The username validation decision.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::collaborators::{DomainResolver, SelfRegistrationStatus, UserStoreDirectory};
use crate::domain::qualify_username;
use crate::error::{PolicyError, PolicyResult};
use crate::outcome::{ErrorCode, ValidationOutcome};
use crate::request::ValidationRequest;

/// Message used when no user store defines a violation message.
pub const DEFAULT_REGEX_VIOLATION_MESSAGE: &str = "Username pattern policy violated";

/// Decides whether a username is acceptable for self sign-up.
///
/// Holds no mutable state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct UsernameValidationPolicy {
    registration: Arc<dyn SelfRegistrationStatus>,
    directory: Arc<dyn UserStoreDirectory>,
    domains: Arc<dyn DomainResolver>,
}

impl std::fmt::Debug for UsernameValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernameValidationPolicy")
            .field("primary_domain", &self.domains.primary_domain_name())
            .finish_non_exhaustive()
    }
}

impl UsernameValidationPolicy {
    pub fn new(
        registration: Arc<dyn SelfRegistrationStatus>,
        directory: Arc<dyn UserStoreDirectory>,
        domains: Arc<dyn DomainResolver>,
    ) -> Self {
        Self {
            registration,
            directory,
            domains,
        }
    }

    /// Evaluate `request` for `tenant_domain`.
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. username present
    /// 2. self-registration enabled (unless `skipSignUpEnableCheck` is `"true"`)
    /// 3. username not taken in its resolved user store
    /// 4. username matches the pattern of that user store
    ///
    /// Collaborator faults, including an unknown tenant, are returned as
    /// `Err` and never folded into an outcome.
    #[instrument(skip(self, request), fields(username = request.username.as_deref().unwrap_or_default()))]
    pub fn evaluate(
        &self,
        request: &ValidationRequest,
        tenant_domain: &str,
    ) -> PolicyResult<ValidationOutcome> {
        let Some(username) = request.username() else {
            debug!("rejected: empty username");
            return Ok(ValidationOutcome::failure(
                ErrorCode::EmptyUsername,
                "Username cannot be empty.",
            ));
        };

        if !self.registration.is_valid_tenant_domain(tenant_domain)? {
            warn!(tenant = tenant_domain, "validation requested for unknown tenant");
            return Err(PolicyError::InvalidTenant(tenant_domain.to_string()));
        }

        if request.skip_sign_up_enable_check() {
            debug!("self-registration enabled check skipped");
        } else if !self
            .registration
            .is_self_registration_enabled(tenant_domain)?
        {
            debug!("rejected: self-registration disabled");
            return Ok(ValidationOutcome::failure(
                ErrorCode::SelfRegistrationDisabled,
                format!("Self registration is not enabled for tenant: {tenant_domain}"),
            ));
        }

        // Both the duplicate and the pattern check look at the same user store.
        let primary = self.domains.primary_domain_name();
        let domain = self.resolve_domain(request, username, &primary);
        let qualified = qualify_username(&domain, username, &primary);

        if self
            .registration
            .is_username_already_taken(&qualified, tenant_domain)?
        {
            debug!(domain = %domain, "rejected: username already taken");
            return Ok(ValidationOutcome::failure(
                ErrorCode::UserAlreadyExists,
                format!("Username '{username}' is already taken. Please pick a different username."),
            ));
        }

        if !self
            .registration
            .is_match_username_regex(tenant_domain, &qualified)?
        {
            let message = self.violation_message(tenant_domain, &domain, &primary)?;
            debug!(domain = %domain, "rejected: username pattern mismatch");
            return Ok(ValidationOutcome::failure(ErrorCode::RegexViolation, message));
        }

        debug!(domain = %domain, "username available");
        Ok(ValidationOutcome::Success)
    }

    /// `realm` property, else the username's domain prefix, else primary.
    fn resolve_domain(&self, request: &ValidationRequest, username: &str, primary: &str) -> String {
        if let Some(realm) = request.realm() {
            return realm.to_ascii_uppercase();
        }
        self.domains
            .extract_domain_from_name(username)
            .unwrap_or_else(|| primary.to_string())
    }

    /// The resolved store's message, falling back to the primary store's.
    fn violation_message(
        &self,
        tenant_domain: &str,
        domain: &str,
        primary: &str,
    ) -> PolicyResult<String> {
        if !domain.eq_ignore_ascii_case(primary) {
            if let Some(message) = self
                .directory
                .regex_violation_message(tenant_domain, domain)?
            {
                return Ok(message);
            }
            debug!(domain, "no violation message on user store, using primary");
        }

        Ok(self
            .directory
            .regex_violation_message(tenant_domain, primary)?
            .unwrap_or_else(|| DEFAULT_REGEX_VIOLATION_MESSAGE.to_string()))
    }
}
