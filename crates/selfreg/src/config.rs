//! Configuration loading.
//!
//! Layers, lowest to highest: built-in defaults, the TOML file, then
//! `SELFREG__*` environment variables (`__` separates nesting levels).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const APP_NAME: &str = "selfreg";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SELFREG";

/// Pattern applied to user stores that do not configure one.
pub const DEFAULT_USERNAME_REGEX: &str = r"[\S]{3,30}";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 9443,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Tenants and their user stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Domain name of the primary user store.
    pub primary_domain: String,
    /// Tenant used when a request does not name one.
    pub default_tenant: String,
    pub tenants: Vec<TenantConfig>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            primary_domain: "PRIMARY".to_string(),
            default_tenant: "carbon.super".to_string(),
            tenants: vec![TenantConfig {
                domain: "carbon.super".to_string(),
                self_registration_enabled: false,
                users: Vec::new(),
                user_stores: vec![UserStoreConfig {
                    domain: "PRIMARY".to_string(),
                    username_regex: DEFAULT_USERNAME_REGEX.to_string(),
                    regex_violation_message: Some("Username pattern policy violated".to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub domain: String,
    #[serde(default)]
    pub self_registration_enabled: bool,
    /// Existing accounts, bare for the primary store or `DOMAIN/name`.
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub user_stores: Vec<UserStoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStoreConfig {
    pub domain: String,
    #[serde(default = "default_username_regex")]
    pub username_regex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_violation_message: Option<String>,
}

fn default_username_regex() -> String {
    DEFAULT_USERNAME_REGEX.to_string()
}

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tenant '{0}' is configured more than once")]
    DuplicateTenant(String),

    #[error("user store '{domain}' is configured more than once in tenant '{tenant}'")]
    DuplicateUserStore { tenant: String, domain: String },

    #[error("default tenant '{0}' is not configured")]
    MissingDefaultTenant(String),

    #[error("primary domain must not be empty")]
    EmptyPrimaryDomain,

    #[error("invalid username regex for user store '{domain}' in tenant '{tenant}': {source}")]
    InvalidRegex {
        tenant: String,
        domain: String,
        #[source]
        source: regex::Error,
    },
}

impl IdentityConfig {
    /// Check structural constraints. Regexes are compiled by the backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_domain.trim().is_empty() {
            return Err(ConfigError::EmptyPrimaryDomain);
        }

        let mut tenants = HashSet::new();
        for tenant in &self.tenants {
            if !tenants.insert(tenant.domain.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateTenant(tenant.domain.clone()));
            }
            let mut stores = HashSet::new();
            for store in &tenant.user_stores {
                if !stores.insert(store.domain.to_ascii_uppercase()) {
                    return Err(ConfigError::DuplicateUserStore {
                        tenant: tenant.domain.clone(),
                        domain: store.domain.clone(),
                    });
                }
            }
        }

        if !tenants.contains(&self.default_tenant.to_ascii_lowercase()) {
            return Err(ConfigError::MissingDefaultTenant(
                self.default_tenant.clone(),
            ));
        }

        Ok(())
    }
}

/// Default config file location, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

/// Load configuration from `path` (or the default location) and the environment.
///
/// A missing file is not an error; defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);

    let mut builder = Config::builder()
        .set_default("server.bind", ServerConfig::default().bind)?
        .set_default("server.port", i64::from(ServerConfig::default().port))?
        .set_default("logging.level", LoggingConfig::default().level)?;

    if let Some(ref path) = path {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(false),
        );
    }

    let built = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("building configuration")?;

    let config: AppConfig = built
        .try_deserialize()
        .context("deserializing configuration")?;

    config
        .identity
        .validate()
        .context("validating identity configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.server.port, 9443);
        assert_eq!(config.identity.primary_domain, "PRIMARY");
        assert_eq!(config.identity.tenants.len(), 1);
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_config(
            r#"
[server]
port = 8080

[identity]
default_tenant = "acme.com"

[[identity.tenants]]
domain = "acme.com"
self_registration_enabled = true
users = ["admin", "SECONDARY/alice"]

[[identity.tenants.user_stores]]
domain = "PRIMARY"
username_regex = "[a-z]{3,16}"

[[identity.tenants.user_stores]]
domain = "SECONDARY"
regex_violation_message = "Secondary user store regex violation message"
"#,
        );

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "127.0.0.1");
        let tenant = &config.identity.tenants[0];
        assert_eq!(tenant.domain, "acme.com");
        assert!(tenant.self_registration_enabled);
        assert_eq!(tenant.users, vec!["admin", "SECONDARY/alice"]);
        assert_eq!(tenant.user_stores[1].username_regex, DEFAULT_USERNAME_REGEX);
        assert_eq!(
            tenant.user_stores[1].regex_violation_message.as_deref(),
            Some("Secondary user store regex violation message")
        );
    }

    #[test]
    fn missing_default_tenant_rejected() {
        let file = write_config(
            r#"
[identity]
default_tenant = "nowhere.org"
"#,
        );
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("default tenant 'nowhere.org' is not configured"));
    }

    #[test]
    fn duplicate_user_store_rejected() {
        let mut identity = IdentityConfig::default();
        identity.tenants[0].user_stores.push(UserStoreConfig {
            domain: "primary".to_string(),
            username_regex: DEFAULT_USERNAME_REGEX.to_string(),
            regex_violation_message: None,
        });
        assert!(matches!(
            identity.validate(),
            Err(ConfigError::DuplicateUserStore { .. })
        ));
    }

    #[test]
    fn duplicate_tenant_rejected() {
        let mut identity = IdentityConfig::default();
        let copy = identity.tenants[0].clone();
        identity.tenants.push(copy);
        assert!(matches!(
            identity.validate(),
            Err(ConfigError::DuplicateTenant(_))
        ));
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let body = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let file = write_config(&body);
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.identity.default_tenant, "carbon.super");
    }
}
