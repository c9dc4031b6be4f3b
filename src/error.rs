use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::store::StoreError;

/// Every failure a handler can surface to a client.
///
/// Only the distinguishable outcomes (bad body, unknown code, wrong method)
/// get their own status. Everything else collapses to an opaque 500 whose
/// detail goes to the log, never the response body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("request body is not a valid create request")]
    BadRequest,

    #[error("short code not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest => (StatusCode::BAD_REQUEST, "Invalid request body"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "URL not found"),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };

        (status, body).into_response()
    }
}
