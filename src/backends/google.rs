//! Google OAuth 1.0 flow shared by Google-hosted services.
//!
//! Request token, authorization redirect and access token exchange all go
//! through Google's accounts endpoints; a service only adds its scope and
//! its own profile call on top.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::core::config::OAuthConfig;
use crate::core::error::OAuthError;
use crate::oauth::request::OAuthRequest;
use crate::oauth::token::{Consumer, Token};

pub const GOOGLE_OAUTH_REQUEST_TOKEN_URL: &str =
    "https://www.google.com/accounts/OAuthGetRequestToken";
pub const GOOGLE_OAUTH_AUTHORIZATION_URL: &str =
    "https://www.google.com/accounts/OAuthAuthorizeToken";
pub const GOOGLE_OAUTH_ACCESS_TOKEN_URL: &str =
    "https://www.google.com/accounts/OAuthGetAccessToken";

pub struct GoogleOAuth {
    client: reqwest::Client,
    consumer: Consumer,
    endpoints: OAuthConfig,
    scope: Vec<String>,
}

impl GoogleOAuth {
    pub fn new(consumer: Consumer, endpoints: OAuthConfig, scope: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoints.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            consumer,
            endpoints,
            scope,
        })
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    /// Space separated scope sent with the request token call
    pub fn scope(&self) -> String {
        self.scope.join(" ")
    }

    /// Build and sign a GET request for `url`
    pub fn oauth_request(
        &self,
        token: Option<&Token>,
        url: &str,
        extra_params: BTreeMap<String, String>,
    ) -> Result<OAuthRequest, OAuthError> {
        let mut request =
            OAuthRequest::from_consumer_and_token(&self.consumer, token, "GET", url, extra_params)?;
        request.sign_hmac_sha1(&self.consumer, token)?;
        Ok(request)
    }

    /// Send a signed request and return the body.
    /// Non-success statuses are errors, the body is not interpreted here.
    pub async fn fetch(&self, request: &OAuthRequest) -> Result<String, OAuthError> {
        let url = request.to_url();
        debug!(url = %url, "Sending signed OAuth request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OAuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    pub async fn unauthorized_token(&self, callback_url: &str) -> Result<Token, OAuthError> {
        let mut params = BTreeMap::new();
        params.insert("oauth_callback".to_string(), callback_url.to_string());
        if !self.scope.is_empty() {
            params.insert("scope".to_string(), self.scope());
        }

        let request = self.oauth_request(None, &self.endpoints.request_token_url, params)?;
        let body = self.fetch(&request).await?;

        Token::from_response(&body)
    }

    pub fn auth_url(&self, token: &Token, callback_url: &str) -> Result<String, OAuthError> {
        let request = OAuthRequest::from_token_and_callback(
            token,
            Some(callback_url),
            &self.endpoints.authorization_url,
        )?;

        Ok(request.to_url())
    }

    pub async fn access_token(
        &self,
        token: &Token,
        verifier: Option<&str>,
    ) -> Result<Token, OAuthError> {
        let token = match verifier {
            Some(verifier) => token.clone().with_verifier(verifier),
            None => token.clone(),
        };

        let request =
            self.oauth_request(Some(&token), &self.endpoints.access_token_url, BTreeMap::new())?;
        let body = self.fetch(&request).await?;

        Token::from_response(&body)
    }
}
