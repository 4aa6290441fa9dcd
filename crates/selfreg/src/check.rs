//! One-shot username check for the `check` subcommand.

use std::io::Write;

use anyhow::{Context, Result};
use selfreg_policy::{
    REALM, SKIP_SIGN_UP_ENABLE_CHECK, UsernameValidationPolicy, ValidationOutcome,
    ValidationRequest,
};

/// Exit status when the username is rejected.
pub const EXIT_REJECTED: i32 = 2;

/// Build the request the HTTP endpoint would receive for the same flags.
pub fn check_request(
    username: impl Into<String>,
    realm: Option<String>,
    skip_signup_check: bool,
) -> ValidationRequest {
    let mut request = ValidationRequest::new(username);
    if let Some(realm) = realm {
        request = request.with_property(REALM, realm);
    }
    if skip_signup_check {
        request = request.with_property(SKIP_SIGN_UP_ENABLE_CHECK, "true");
    }
    request
}

/// Process exit status for an outcome.
pub fn exit_code(outcome: &ValidationOutcome) -> i32 {
    if outcome.is_success() { 0 } else { EXIT_REJECTED }
}

/// Write an outcome as pretty JSON or a single text line.
pub fn write_outcome(out: &mut impl Write, outcome: &ValidationOutcome, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, outcome).context("writing outcome")?;
        writeln!(out)?;
    } else {
        match outcome {
            ValidationOutcome::Success => writeln!(out, "available")?,
            ValidationOutcome::Failure { code, message } => {
                writeln!(out, "rejected: {code}: {message}")?
            }
        }
    }
    Ok(())
}

/// Evaluate `request` for `tenant`, report it to `out` and return the exit status.
pub fn run_check(
    policy: &UsernameValidationPolicy,
    tenant: &str,
    request: &ValidationRequest,
    json: bool,
    out: &mut impl Write,
) -> Result<i32> {
    let outcome = policy
        .evaluate(request, tenant)
        .with_context(|| format!("validating username for tenant {tenant}"))?;
    write_outcome(out, &outcome, json)?;
    Ok(exit_code(&outcome))
}
