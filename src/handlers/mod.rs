pub mod create;
pub mod resolve;

use axum::http::StatusCode;

use crate::error::AppError;

/// Fallback for any verb a route does not serve. Touches nothing.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}
