//! Test utilities and common setup.

use axum::Router;
use selfreg::api::{self, AppState};
use selfreg::backend::IdentityBackend;
use selfreg::config::{IdentityConfig, TenantConfig, UserStoreConfig};

pub const SUPER_TENANT: &str = "carbon.super";
pub const ACME_TENANT: &str = "acme.com";

fn store(domain: &str, regex: &str, message: Option<&str>) -> UserStoreConfig {
    UserStoreConfig {
        domain: domain.to_string(),
        username_regex: regex.to_string(),
        regex_violation_message: message.map(str::to_string),
    }
}

/// Super tenant with self-registration disabled and `test` taken, plus an
/// enabled tenant with primary and secondary user stores.
pub fn test_identity() -> IdentityConfig {
    IdentityConfig {
        primary_domain: "PRIMARY".to_string(),
        default_tenant: SUPER_TENANT.to_string(),
        tenants: vec![
            TenantConfig {
                domain: SUPER_TENANT.to_string(),
                self_registration_enabled: false,
                users: vec!["test".to_string()],
                user_stores: vec![store(
                    "PRIMARY",
                    r"[\S]{3,30}",
                    Some("Primary user store regex violation message"),
                )],
            },
            TenantConfig {
                domain: ACME_TENANT.to_string(),
                self_registration_enabled: true,
                users: vec!["SECONDARY/taken".to_string()],
                user_stores: vec![
                    store(
                        "PRIMARY",
                        "[a-zA-Z0-9]{3,30}",
                        Some("Primary user store regex violation message"),
                    ),
                    store(
                        "SECONDARY",
                        "[a-z]{3,10}",
                        Some("Secondary user store regex violation message"),
                    ),
                    store("TERTIARY", "[a-z]{3,10}", None),
                ],
            },
        ],
    }
}

/// Create a test application backed by [`test_identity`].
pub fn test_app() -> Router {
    let backend = IdentityBackend::from_config(&test_identity()).unwrap();
    let state = AppState::new(backend.into_policy(), SUPER_TENANT);
    api::create_router(state)
}
