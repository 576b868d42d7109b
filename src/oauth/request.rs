use std::collections::BTreeMap;
use url::Url;

use crate::core::error::OAuthError;
use crate::oauth::signature::{
    hmac_sha1_signature, percent_encode, signature_base_string, signing_key, SIGNATURE_METHOD,
};
use crate::oauth::token::{Consumer, Token};
use crate::utils::time::current_timestamp;

pub const OAUTH_VERSION: &str = "1.0";

/// A single OAuth 1.0 request: target URL plus the parameters sent with it.
///
/// Parameters already present in the URL query take part in the signature
/// and are carried over by [`OAuthRequest::to_url`].
#[derive(Debug, Clone)]
pub struct OAuthRequest {
    method: String,
    url: Url,
    params: BTreeMap<String, String>,
}

impl OAuthRequest {
    pub fn new(
        method: &str,
        url: &str,
        params: BTreeMap<String, String>,
    ) -> Result<Self, OAuthError> {
        let url = Url::parse(url).map_err(|e| OAuthError::InvalidUrl(format!("{}: {}", url, e)))?;

        Ok(Self {
            method: method.to_ascii_uppercase(),
            url,
            params,
        })
    }

    /// Fill in the protocol parameters for a consumer, and a token when there is one
    pub fn from_consumer_and_token(
        consumer: &Consumer,
        token: Option<&Token>,
        method: &str,
        url: &str,
        mut params: BTreeMap<String, String>,
    ) -> Result<Self, OAuthError> {
        params.insert("oauth_consumer_key".to_string(), consumer.key.clone());
        params.insert("oauth_timestamp".to_string(), current_timestamp().to_string());
        params.insert("oauth_nonce".to_string(), generate_nonce());
        params.insert("oauth_version".to_string(), OAUTH_VERSION.to_string());

        if let Some(token) = token {
            params.insert("oauth_token".to_string(), token.key.clone());
            if let Some(verifier) = &token.verifier {
                params.insert("oauth_verifier".to_string(), verifier.clone());
            }
        }

        Self::new(method, url, params)
    }

    /// Unsigned redirect to the provider's authorization page
    pub fn from_token_and_callback(
        token: &Token,
        callback: Option<&str>,
        url: &str,
    ) -> Result<Self, OAuthError> {
        let mut params = BTreeMap::new();
        params.insert("oauth_token".to_string(), token.key.clone());
        if let Some(callback) = callback {
            params.insert("oauth_callback".to_string(), callback.to_string());
        }

        Self::new("GET", url, params)
    }

    pub fn sign_hmac_sha1(
        &mut self,
        consumer: &Consumer,
        token: Option<&Token>,
    ) -> Result<(), OAuthError> {
        self.params.remove("oauth_signature");
        self.params
            .insert("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string());

        let base_string = signature_base_string(&self.method, &self.url, &self.all_parameters());
        let key = signing_key(&consumer.secret, token.map(|t| t.secret.as_str()));
        let signature = hmac_sha1_signature(&base_string, &key)?;

        self.params.insert("oauth_signature".to_string(), signature);
        Ok(())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn get_parameter(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// URL query pairs followed by the request parameters
    fn all_parameters(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .filter(|(k, _)| !self.params.contains_key(k))
            .chain(self.params.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }

    /// Full GET URL with every parameter in the query string
    pub fn to_url(&self) -> String {
        let mut base = self.url.clone();
        base.set_query(None);
        base.set_fragment(None);

        let query = self
            .all_parameters()
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }
}

fn generate_nonce() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
