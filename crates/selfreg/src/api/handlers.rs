//! API request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use selfreg_policy::{ValidationOutcome, ValidationRequest};
use serde::Serialize;
use tracing::instrument;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Code returned with a 200 response.
pub const CODE_USERNAME_AVAILABLE: &str = "USERNAME_AVAILABLE";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Body of both the available and the rejected username responses.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub code: &'static str,
    pub message: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/identity/user/v1.0/validate-username` for the default tenant.
#[instrument(skip_all)]
pub async fn validate_username(
    State(state): State<AppState>,
    Json(request): Json<ValidationRequest>,
) -> ApiResult<Response> {
    validate(&state, &state.default_tenant, &request)
}

/// `POST /t/{tenant}/api/identity/user/v1.0/validate-username`.
#[instrument(skip_all, fields(tenant = %tenant))]
pub async fn validate_username_for_tenant(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    Json(request): Json<ValidationRequest>,
) -> ApiResult<Response> {
    validate(&state, &tenant, &request)
}

fn validate(state: &AppState, tenant: &str, request: &ValidationRequest) -> ApiResult<Response> {
    let username = request.username().unwrap_or_default();
    match state.policy.evaluate(request, tenant)? {
        ValidationOutcome::Success => Ok((
            StatusCode::OK,
            Json(ValidationResponse {
                code: CODE_USERNAME_AVAILABLE,
                message: format!("Username '{username}' is available"),
            }),
        )
            .into_response()),
        ValidationOutcome::Failure { code, message } if code.is_input_error() => {
            Err(ApiError::bad_request(message))
        }
        ValidationOutcome::Failure { code, message } => Ok((
            StatusCode::BAD_REQUEST,
            Json(ValidationResponse {
                code: code.as_str(),
                message,
            }),
        )
            .into_response()),
    }
}
