//! Config-backed identity backend.
//!
//! Tenants and their user stores are kept as plain lookup tables: tenant
//! domain (lower case) to tenant entry, user-store domain (upper case) to
//! store entry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use selfreg_policy::{
    DomainNames, DomainResolver, PolicyError, PolicyResult, SelfRegistrationStatus,
    UserStoreDirectory, UsernameValidationPolicy, qualify_username, strip_domain,
};
use tracing::debug;

use crate::config::{ConfigError, DEFAULT_USERNAME_REGEX, IdentityConfig, UserStoreConfig};

#[derive(Debug)]
struct UserStore {
    pattern: Regex,
    violation_message: Option<String>,
}

impl UserStore {
    fn compile(tenant: &str, store: &UserStoreConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: full_match(&store.username_regex).map_err(|source| {
                ConfigError::InvalidRegex {
                    tenant: tenant.to_string(),
                    domain: store.domain.clone(),
                    source,
                }
            })?,
            violation_message: store.regex_violation_message.clone(),
        })
    }
}

#[derive(Debug)]
struct Tenant {
    self_registration_enabled: bool,
    stores: HashMap<String, UserStore>,
    /// Canonical names: bare for the primary store, else `DOMAIN/name`.
    users: HashSet<String>,
}

/// Anchors `pattern` so it must match the whole username.
fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Identity backend answering registration and user-store lookups from config.
#[derive(Debug)]
pub struct IdentityBackend {
    domains: DomainNames,
    tenants: HashMap<String, Tenant>,
}

impl IdentityBackend {
    /// Build lookup tables from config, compiling every username regex.
    ///
    /// Tenants without a primary store entry get one with the default pattern.
    pub fn from_config(config: &IdentityConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let domains = DomainNames::new(&config.primary_domain);
        let primary = domains.primary_domain_name();
        let mut tenants = HashMap::with_capacity(config.tenants.len());

        for tenant in &config.tenants {
            let mut stores = HashMap::with_capacity(tenant.user_stores.len() + 1);
            for store in &tenant.user_stores {
                stores.insert(
                    store.domain.to_ascii_uppercase(),
                    UserStore::compile(&tenant.domain, store)?,
                );
            }
            if !stores.contains_key(&primary) {
                let store = UserStoreConfig {
                    domain: primary.clone(),
                    username_regex: DEFAULT_USERNAME_REGEX.to_string(),
                    regex_violation_message: None,
                };
                stores.insert(primary.clone(), UserStore::compile(&tenant.domain, &store)?);
            }

            let users = tenant
                .users
                .iter()
                .map(|user| canonical_name(&domains, user))
                .collect();

            tenants.insert(
                tenant.domain.to_ascii_lowercase(),
                Tenant {
                    self_registration_enabled: tenant.self_registration_enabled,
                    stores,
                    users,
                },
            );
        }

        debug!(tenants = tenants.len(), "identity backend loaded");
        Ok(Self { domains, tenants })
    }

    /// Wrap this backend in a validation policy.
    pub fn into_policy(self) -> UsernameValidationPolicy {
        let domains = Arc::new(self.domains.clone());
        let backend = Arc::new(self);
        UsernameValidationPolicy::new(backend.clone(), backend, domains)
    }

    fn tenant(&self, tenant_domain: &str) -> PolicyResult<&Tenant> {
        self.tenants
            .get(&tenant_domain.to_ascii_lowercase())
            .ok_or_else(|| PolicyError::InvalidTenant(tenant_domain.to_string()))
    }

    /// Domain of a possibly qualified username, primary when bare.
    fn domain_of(&self, username: &str) -> String {
        self.domains
            .extract_domain_from_name(username)
            .unwrap_or_else(|| self.domains.primary_domain_name())
    }
}

fn canonical_name(domains: &DomainNames, username: &str) -> String {
    let primary = domains.primary_domain_name();
    let domain = domains
        .extract_domain_from_name(username)
        .unwrap_or_else(|| primary.clone());
    qualify_username(&domain, username, &primary)
}

impl SelfRegistrationStatus for IdentityBackend {
    fn is_self_registration_enabled(&self, tenant_domain: &str) -> PolicyResult<bool> {
        Ok(self.tenant(tenant_domain)?.self_registration_enabled)
    }

    fn is_username_already_taken(
        &self,
        qualified_username: &str,
        tenant_domain: &str,
    ) -> PolicyResult<bool> {
        let tenant = self.tenant(tenant_domain)?;
        Ok(tenant
            .users
            .contains(&canonical_name(&self.domains, qualified_username)))
    }

    fn is_match_username_regex(
        &self,
        tenant_domain: &str,
        qualified_username: &str,
    ) -> PolicyResult<bool> {
        let tenant = self.tenant(tenant_domain)?;
        let domain = self.domain_of(qualified_username);
        let store = tenant
            .stores
            .get(&domain)
            .ok_or_else(|| PolicyError::UnknownUserStore {
                tenant: tenant_domain.to_string(),
                domain: domain.clone(),
            })?;
        Ok(store.pattern.is_match(strip_domain(qualified_username)))
    }

    fn is_valid_tenant_domain(&self, tenant_domain: &str) -> PolicyResult<bool> {
        Ok(self
            .tenants
            .contains_key(&tenant_domain.to_ascii_lowercase()))
    }
}

impl UserStoreDirectory for IdentityBackend {
    fn regex_violation_message(
        &self,
        tenant_domain: &str,
        domain: &str,
    ) -> PolicyResult<Option<String>> {
        let tenant = self.tenant(tenant_domain)?;
        Ok(tenant
            .stores
            .get(&domain.to_ascii_uppercase())
            .and_then(|store| store.violation_message.clone()))
    }
}
