//! Error types for songreviews

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Reasons an authentication attempt or a bearer token is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("user not found")]
    NotFound,

    #[error("password does not match")]
    BadCredential,

    #[error("token could not be parsed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("no bearer token supplied")]
    MissingToken,
}

impl AuthFailure {
    /// Whether this failure came from a login attempt rather than a token check
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthFailure::NotFound | AuthFailure::BadCredential)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'songreviews init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthFailure),

    #[error("Username '{0}' is already registered")]
    UsernameTaken(String),

    #[error("Review {0} not found")]
    ReviewNotFound(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            // Clients never learn which check failed; the reason is only logged
            Error::Auth(failure) => {
                tracing::debug!("Rejected request: {}", failure);
                let detail = if failure.is_credential_failure() {
                    "Incorrect username or password"
                } else {
                    "Could not validate credentials"
                };
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(json!({ "detail": detail })),
                )
                    .into_response()
            }
            Error::UsernameTaken(_) => (
                StatusCode::CONFLICT,
                Json(json!({ "detail": "Username already registered" })),
            )
                .into_response(),
            Error::ReviewNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Review not found" })),
            )
                .into_response(),
            Error::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": message })),
            )
                .into_response(),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_unauthorized() {
        for failure in [
            AuthFailure::NotFound,
            AuthFailure::BadCredential,
            AuthFailure::Malformed,
            AuthFailure::BadSignature,
            AuthFailure::Expired,
            AuthFailure::MissingToken,
        ] {
            let response = Error::Auth(failure).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::UsernameTaken("alice".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::ReviewNotFound(7).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Validation("song_name must not be empty".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::Config("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_credential_failure_classification() {
        assert!(AuthFailure::NotFound.is_credential_failure());
        assert!(AuthFailure::BadCredential.is_credential_failure());
        assert!(!AuthFailure::Expired.is_credential_failure());
        assert!(!AuthFailure::MissingToken.is_credential_failure());
    }
}
