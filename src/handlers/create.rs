use crate::{
    error::AppError,
    models::{CreateUrlRequest, UrlMapping},
    store::StoreError,
    AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// POST /
///
/// 1. Parse `{"long_url": ...}` from the raw body. Anything unparseable is a
///    400 and the store is never touched.
/// 2. Insert a new mapping under a freshly generated code, retrying with a new
///    code whenever the store reports the code is taken.
/// 3. Return 201 with the stored record as JSON.
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CreateUrlRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejecting create request: {}", e);
        AppError::BadRequest
    })?;

    let mapping = insert_with_fresh_code(&state, &req.long_url).await?;
    tracing::info!("Created short code '{}'", mapping.short_url);

    Ok((StatusCode::CREATED, Json(mapping)).into_response())
}

async fn insert_with_fresh_code(state: &AppState, long_url: &str) -> Result<UrlMapping, AppError> {
    for attempt in 1..=state.codes.attempts {
        let mapping = UrlMapping::new(state.codes.generate(), long_url);
        match state.store.insert(&mapping).await {
            Ok(()) => return Ok(mapping),
            Err(StoreError::Conflict(code)) => {
                tracing::warn!(
                    "Short code '{}' already taken (attempt {}/{})",
                    code,
                    attempt,
                    state.codes.attempts
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(format!(
        "no free short code after {} attempts",
        state.codes.attempts
    )))
}
