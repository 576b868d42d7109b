// Centralized error handling for the auth service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::auth::ErrorResponse;

/// Failures while talking OAuth 1.0 to a provider
#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to sign request: {0}")]
    Signature(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),
}

/// Errors surfaced by the login and completion endpoints
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unknown authentication backend: {0}")]
    UnknownBackend(String),

    #[error("Authentication backend is not configured: {0}")]
    BackendDisabled(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Unauthorized token not found or expired")]
    MissingToken,

    #[error("Incorrect tokens")]
    IncorrectTokens,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider error: {0}")]
    Upstream(#[from] OAuthError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UnknownBackend(_) => StatusCode::NOT_FOUND,
            AuthError::BackendDisabled(_) => StatusCode::FORBIDDEN,
            AuthError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AuthError::MissingToken => StatusCode::BAD_REQUEST,
            AuthError::IncorrectTokens => StatusCode::BAD_REQUEST,
            AuthError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
