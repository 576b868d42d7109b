use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::core::error::{AuthError, OAuthError};
use crate::models::auth::AuthResult;
use crate::models::user::UserDetails;
use crate::oauth::token::Token;
use crate::utils::auth::verify_token;

/// Key holding the provider's user id in the profile response
pub const ID_KEY: &str = "id";

/// A pluggable OAuth 1.0 login provider.
///
/// Implementations own their consumer credentials and endpoints; the HTTP
/// layer only drives the three legs of the flow through this trait.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Name used in URLs and stored with the social account
    fn name(&self) -> &'static str;

    /// Whether both consumer credentials are configured
    fn enabled(&self) -> bool;

    /// Obtain a request token; `callback_url` is where the user is sent back
    async fn unauthorized_token(&self, callback_url: &str) -> Result<Token, OAuthError>;

    /// Provider page the user is redirected to for approval
    fn auth_url(&self, token: &Token, callback_url: &str) -> Result<String, OAuthError>;

    /// Exchange an approved request token for an access token
    async fn access_token(
        &self,
        token: &Token,
        verifier: Option<&str>,
    ) -> Result<Token, OAuthError>;

    /// Load the user's profile. `Ok(None)` means the provider answered but
    /// the answer held no usable data.
    async fn user_data(&self, access_token: &Token) -> Result<Option<Value>, OAuthError>;

    fn get_user_details(&self, response: &Value) -> UserDetails;

    fn get_user_id(&self, response: &Value) -> Option<String> {
        match response.get(ID_KEY)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    fn extra_data(&self, access_token: &Token) -> BTreeMap<String, String> {
        BTreeMap::from([("access_token".to_string(), access_token.to_string())])
    }
}

/// Finish a login once the provider redirects back.
///
/// `pending` is the request token issued at the start of the flow and
/// `returned_token` the `oauth_token` the provider sent with the callback.
pub async fn auth_complete(
    backend: &dyn AuthBackend,
    pending: &Token,
    returned_token: &str,
    verifier: Option<&str>,
) -> Result<AuthResult, AuthError> {
    if !verify_token(returned_token, &pending.key) {
        warn!(backend = backend.name(), "Returned oauth_token does not match pending token");
        return Err(AuthError::IncorrectTokens);
    }

    let access_token = backend.access_token(pending, verifier).await?;

    let response = backend.user_data(&access_token).await?.ok_or_else(|| {
        AuthError::AuthenticationFailed("provider returned no user data".to_string())
    })?;

    let uid = backend.get_user_id(&response).ok_or_else(|| {
        AuthError::AuthenticationFailed("user id missing from provider response".to_string())
    })?;

    let details = backend.get_user_details(&response);

    info!(
        backend = backend.name(),
        uid = %uid,
        complete_details = details.is_complete(),
        "User authenticated"
    );

    Ok(AuthResult {
        backend: backend.name().to_string(),
        uid,
        details,
        extra_data: backend.extra_data(&access_token),
    })
}
