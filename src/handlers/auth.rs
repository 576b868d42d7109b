use crate::backends::base::{auth_complete, AuthBackend};
use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::auth::{AuthResponse, BackendListResponse, CompleteQuery};
use crate::stores::token_store::PendingToken;
use crate::utils::auth::generate_session_id;
use crate::utils::time::current_timestamp;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

fn resolve_backend(state: &AppState, name: &str) -> Result<Arc<dyn AuthBackend>, AuthError> {
    let backend = state
        .registry
        .get(name)
        .ok_or_else(|| AuthError::UnknownBackend(name.to_string()))?;

    if !backend.enabled() {
        return Err(AuthError::BackendDisabled(name.to_string()));
    }

    Ok(backend)
}

/// Where the provider sends the user after approval
pub fn callback_url(public_url: &str, backend: &str, session_id: &str) -> String {
    format!(
        "{}/complete/{}?session={}",
        public_url.trim_end_matches('/'),
        backend,
        session_id
    )
}

/// List enabled backends
///
/// GET /backends
pub async fn backends_handler(State(state): State<Arc<AppState>>) -> Json<BackendListResponse> {
    Json(BackendListResponse {
        success: true,
        backends: state
            .registry
            .enabled_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Start a login: fetch a request token and redirect to the provider
///
/// GET /login/{backend}
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
) -> Result<Response, AuthError> {
    let backend = resolve_backend(&state, &backend_name)?;

    let session_id = generate_session_id();
    let callback = callback_url(&state.config.server.public_url, backend.name(), &session_id);

    let token = backend.unauthorized_token(&callback).await.map_err(|e| {
        warn!(backend = backend.name(), error = %e, "Failed to obtain request token");
        AuthError::from(e)
    })?;
    let redirect = backend.auth_url(&token, &callback)?;

    info!(
        backend = backend.name(),
        oauth_token = %token.key,
        "Login started, redirecting to provider"
    );

    state.token_store.insert(
        session_id,
        PendingToken::new(backend.name(), token, current_timestamp()),
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, redirect)]).into_response())
}

/// Finish a login after the provider redirects back
///
/// GET /complete/{backend}?session=<id>&oauth_token=<token>&oauth_verifier=<verifier>
pub async fn complete_handler(
    State(state): State<Arc<AppState>>,
    Path(backend_name): Path<String>,
    Query(params): Query<CompleteQuery>,
) -> Result<Response, AuthError> {
    let backend = resolve_backend(&state, &backend_name)?;

    let session_id = params
        .session
        .ok_or_else(|| AuthError::MissingParameter("session".to_string()))?;
    let returned_token = params
        .oauth_token
        .ok_or_else(|| AuthError::MissingParameter("oauth_token".to_string()))?;

    // The pending token is single use, even when the attempt below fails
    let pending = state
        .token_store
        .take(
            &session_id,
            state.config.session.pending_token_ttl,
            current_timestamp(),
        )
        .ok_or(AuthError::MissingToken)?;

    if pending.backend != backend.name() {
        warn!(
            backend = backend.name(),
            pending_backend = %pending.backend,
            "Callback backend does not match pending login"
        );
        return Err(AuthError::IncorrectTokens);
    }

    let result = auth_complete(
        backend.as_ref(),
        &pending.token,
        &returned_token,
        params.oauth_verifier.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            success: true,
            result,
        }),
    )
        .into_response())
}
