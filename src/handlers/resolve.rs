use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// GET /:shortURL
///
/// 1. Look the code up in the store (miss → 404, store failure → 500) and
///    build the `Location` header (unusable URL → 500).
/// 2. Spawn a detached task that bumps the access counter. Its outcome only
///    reaches the log; the redirect never waits for it.
/// 3. Return a 301 pointing at the original URL.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let mapping = state.store.get(&code).await?.ok_or(AppError::NotFound)?;

    let location = HeaderValue::try_from(mapping.long_url.as_str()).map_err(|_| {
        AppError::Internal(format!(
            "stored URL for '{}' is not a valid Location header",
            mapping.short_url
        ))
    })?;

    // Only a redirect that will actually be sent counts as an access.
    let store = state.store.clone();
    tokio::spawn(async move {
        if let Err(e) = store.increment(&code, 1).await {
            tracing::warn!("Failed to increment access count for '{}': {}", code, e);
        }
    });

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}
