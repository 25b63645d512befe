use crate::error::{AppError, Result};
use crate::model::ShortenBody;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use snaplink_core::ValidationError;
use snaplink_shortener::ShortenRequest;
use tracing::{debug, warn};

/// `POST /short`: answers with a plain-text line carrying the short URL.
///
/// The body is decoded as JSON whatever its `Content-Type`, so a bare
/// `curl -d '{"url":"..."}'` works.
pub async fn shorten_handler(State(state): State<AppState>, body: Bytes) -> Result<String> {
    let body: ShortenBody = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejecting malformed shorten body");
        ValidationError::MalformedBody(e.to_string())
    })?;

    let shortened = state
        .shortener()
        .shorten(ShortenRequest::new(body.url.unwrap_or_default()))
        .await?;

    Ok(format!("Shortened URL: {}\n", shortened.short_url))
}

/// `GET /{code}`: permanent redirect to the stored URL.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let target = state.redirector().resolve(&code).await?;

    let location = HeaderValue::try_from(target.as_str()).map_err(|e| {
        warn!(code = %code, error = %e, "stored url is not a valid location header");
        AppError::InvalidRedirectTarget { code: code.clone() }
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// `GET /`: a read without a code.
pub async fn missing_code_handler() -> AppError {
    ValidationError::MissingShortCode.into()
}
