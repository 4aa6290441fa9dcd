//! Validation request model.

use serde::{Deserialize, Serialize};

/// Property key that skips the self-registration enabled check.
pub const SKIP_SIGN_UP_ENABLE_CHECK: &str = "skipSignUpEnableCheck";

/// Property key naming the user-store domain explicitly.
pub const REALM: &str = "realm";

/// A single request property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A "validate username" request.
///
/// Constructed once per call and discarded after evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ValidationRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            properties: Vec::new(),
        }
    }

    /// Append a property, keeping insertion order.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(key, value));
        self
    }

    /// The username, if present and non-empty.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }

    /// Value of the first property with the given key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// True only when `skipSignUpEnableCheck` is the literal `"true"`.
    pub fn skip_sign_up_enable_check(&self) -> bool {
        self.property(SKIP_SIGN_UP_ENABLE_CHECK) == Some("true")
    }

    /// Explicit user-store domain from the `realm` property, ignoring blanks.
    pub fn realm(&self) -> Option<&str> {
        self.property(REALM)
            .map(str::trim)
            .filter(|realm| !realm.is_empty())
    }
}
