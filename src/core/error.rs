use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Reqwest error: {0}")]
    HTTPClient(#[from] reqwest::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Invalid API URL: {0}")]
    ApiUrl(String),
    #[error("API key is not a valid header value")]
    ApiKey,
}

/// Failures while signing a session token.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("No signing secret configured")]
    MissingSecret,
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Reasons a session token was rejected. Never surfaced to clients; the
/// session layer turns every variant into "no valid session".
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("No signing secret configured")]
    MissingSecret,
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Expired token")]
    Expired,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),
    #[error("Reqwest error: {0}")]
    HTTPClient(#[from] reqwest::Error),
    #[error("Backend responded with {0}")]
    Backend(StatusCode),
    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
    #[error("Malformed request path")]
    MalformedPath,
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Unauthorized(_) => tracing::debug!("{:?}", self),
            _ => tracing::error!("{:?}", self),
        }

        let (status, message) = match self {
            Error::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason),
            Error::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Session error"),
            Error::HTTPClient(_) => (StatusCode::BAD_GATEWAY, "Backend unavailable"),
            Error::Backend(status) => (
                status,
                status.canonical_reason().unwrap_or("Backend error"),
            ),
            Error::Header(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Invalid header value"),
            Error::MalformedPath => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            Error::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, message).into_response()
    }
}
