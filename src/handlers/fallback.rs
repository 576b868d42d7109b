use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};

use crate::models::auth::ErrorResponse;

pub async fn fallback_handler(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!(
                "No route for {}. Valid endpoints: /health, /backends, /login/{{backend}}, /complete/{{backend}}",
                uri.path()
            ),
        }),
    )
        .into_response()
}
