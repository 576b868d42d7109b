use serde::Deserialize;
use std::fmt;
use url::form_urlencoded;

use crate::core::error::OAuthError;

/// Application credentials issued by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

/// Request or access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub key: String,
    pub secret: String,
    pub verifier: Option<String>,
    pub callback_confirmed: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    oauth_token: Option<String>,
    oauth_token_secret: Option<String>,
    oauth_callback_confirmed: Option<String>,
}

impl Token {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            verifier: None,
            callback_confirmed: false,
        }
    }

    /// Parse a form-encoded token endpoint response
    pub fn from_response(body: &str) -> Result<Self, OAuthError> {
        let response: TokenResponse = serde_urlencoded::from_str(body.trim())
            .map_err(|e| OAuthError::InvalidTokenResponse(e.to_string()))?;

        let key = response
            .oauth_token
            .filter(|key| !key.is_empty())
            .ok_or_else(|| OAuthError::InvalidTokenResponse("missing oauth_token".to_string()))?;

        let secret = response.oauth_token_secret.ok_or_else(|| {
            OAuthError::InvalidTokenResponse("missing oauth_token_secret".to_string())
        })?;

        Ok(Self {
            key,
            secret,
            verifier: None,
            callback_confirmed: response.oauth_callback_confirmed.as_deref() == Some("true"),
        })
    }

    pub fn with_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.verifier = Some(verifier.into());
        self
    }
}

/// `oauth_token=..&oauth_token_secret=..`, the form stored alongside a social account
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("oauth_token", &self.key)
            .append_pair("oauth_token_secret", &self.secret);

        if self.callback_confirmed {
            serializer.append_pair("oauth_callback_confirmed", "true");
        }

        f.write_str(&serializer.finish())
    }
}
