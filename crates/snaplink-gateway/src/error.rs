use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snaplink_core::{StoreError, ValidationError};
use snaplink_redirector::ResolveError;
use snaplink_shortener::ShortenError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Everything a handler can fail with. Rendered as a plain-text body
/// carrying the error description.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Shorten(#[from] ShortenError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The stored URL cannot be carried in a `Location` header.
    #[error("invalid redirect target for {code}")]
    InvalidRedirectTarget { code: String },
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        StoreError::InvalidData(_) => StatusCode::BAD_GATEWAY,
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Shorten(ShortenError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Shorten(ShortenError::Generation(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Shorten(ShortenError::Store(e)) => store_status(e),
            AppError::Resolve(ResolveError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Resolve(ResolveError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Resolve(ResolveError::Backend(e)) => store_status(e),
            AppError::InvalidRedirectTarget { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaplink_core::{GenerationError, ShortCode};

    #[test]
    fn status_codes_follow_error_class() {
        let cases = [
            (
                AppError::from(ValidationError::MissingUrl),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ShortenError::from(GenerationError::Exhausted(
                    "id space".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(ShortenError::from(StoreError::Unavailable(
                    "down".to_string(),
                ))),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::from(ResolveError::NotFound(ShortCode::new_unchecked("x"))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(ResolveError::Backend(StoreError::Timeout(
                    "slow".to_string(),
                ))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::from(ResolveError::Backend(StoreError::InvalidData(
                    "bytes".to_string(),
                ))),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::InvalidRedirectTarget {
                    code: "x".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[test]
    fn missing_short_code_is_bad_request() {
        let response = AppError::from(ValidationError::MissingShortCode).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
