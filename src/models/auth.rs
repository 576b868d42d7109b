use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::user::UserDetails;

/// Query string Google appends to the callback URL
#[derive(Debug, Deserialize)]
pub struct CompleteQuery {
    pub session: Option<String>,
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
}

/// Outcome of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResult {
    pub backend: String,
    /// Provider-side user id
    pub uid: String,
    pub details: UserDetails,
    pub extra_data: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: AuthResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendListResponse {
    pub success: bool,
    pub backends: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
