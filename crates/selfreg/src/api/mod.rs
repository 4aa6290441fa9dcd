//! HTTP API for username validation.
//!
//! - `handlers`: health and validate-username handlers
//! - `routes`: router construction
//! - `error`: structured error responses
//! - `state`: shared handler state

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::{CODE_USERNAME_AVAILABLE, HealthResponse, ValidationResponse};
pub use routes::{VALIDATE_USERNAME_PATH, create_router};
pub use state::AppState;
