//! User-store domain helpers.
//!
//! A domain-qualified username has the form `DOMAIN/name`. Domain names are
//! compared case-insensitively and normalized to upper case.

use crate::collaborators::DomainResolver;

/// Separator between domain and name.
pub const DOMAIN_SEPARATOR: char = '/';

/// Default primary user-store domain.
pub const DEFAULT_PRIMARY_DOMAIN: &str = "PRIMARY";

/// The name part of a possibly qualified username.
pub fn strip_domain(username: &str) -> &str {
    match username.split_once(DOMAIN_SEPARATOR) {
        Some((domain, name)) if !domain.is_empty() => name,
        _ => username,
    }
}

/// Qualify `username` with `domain`, leaving it bare for the primary domain.
///
/// Any domain prefix already on `username` is replaced, never duplicated.
pub fn qualify_username(domain: &str, username: &str, primary_domain: &str) -> String {
    let name = strip_domain(username);
    if domain.eq_ignore_ascii_case(primary_domain) {
        name.to_string()
    } else {
        format!("{}{DOMAIN_SEPARATOR}{name}", domain.to_ascii_uppercase())
    }
}

/// Resolver for `DOMAIN/name` usernames with a fixed primary domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainNames {
    primary: String,
}

impl DomainNames {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into().to_ascii_uppercase(),
        }
    }
}

impl Default for DomainNames {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_DOMAIN)
    }
}

impl DomainResolver for DomainNames {
    fn extract_domain_from_name(&self, username: &str) -> Option<String> {
        let (domain, _) = username.split_once(DOMAIN_SEPARATOR)?;
        if domain.is_empty() {
            return None;
        }
        Some(domain.to_ascii_uppercase())
    }

    fn primary_domain_name(&self) -> String {
        self.primary.clone()
    }
}
