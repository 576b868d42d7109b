// HTTP routes configuration

use crate::core::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::handlers::health::health_handler))
        .route("/backends", get(crate::handlers::auth::backends_handler))

        // OAuth flow
        .route("/login/{backend}", get(crate::handlers::auth::login_handler))
        .route("/complete/{backend}", get(crate::handlers::auth::complete_handler))

        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
