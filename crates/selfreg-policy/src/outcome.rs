//! Validation outcomes and the error-code taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Username missing or empty (user input error).
    EmptyUsername,
    /// Self-registration is turned off for the tenant.
    SelfRegistrationDisabled,
    /// An account with this username exists.
    UserAlreadyExists,
    /// Username does not match the user store's pattern.
    RegexViolation,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "EMPTY_USERNAME",
            Self::SelfRegistrationDisabled => "SELF_REGISTRATION_DISABLED",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::RegexViolation => "REGEX_VIOLATION",
        }
    }

    /// True for malformed input, false for policy rejections.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyUsername)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Success,
    Failure { code: ErrorCode, message: String },
}

impl ValidationOutcome {
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success => None,
            Self::Failure { code, .. } => Some(*code),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}
