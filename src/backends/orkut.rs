//! Orkut OAuth support.
//!
//! Scope is limited to `http://orkut.gmodules.com/social/` by default and can
//! be extended with `orkut.extra_scope`. Name, display name and emails are the
//! default requested person fields; more can be listed in `orkut.extra_data`.
//! Both `orkut.consumer_key` and `orkut.consumer_secret` must be set for the
//! backend to be enabled.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::backends::base::AuthBackend;
use crate::backends::google::GoogleOAuth;
use crate::core::config::{OAuthConfig, OrkutConfig};
use crate::core::error::OAuthError;
use crate::models::user::UserDetails;
use crate::oauth::token::{Consumer, Token};

pub const ORKUT_BACKEND_NAME: &str = "orkut";
pub const ORKUT_SCOPE: &[&str] = &["http://orkut.gmodules.com/social/"];
pub const ORKUT_REST_ENDPOINT: &str = "http://www.orkut.com/social/rpc";
pub const ORKUT_DEFAULT_DATA: &str = "name,displayName,emails";

pub struct OrkutAuth {
    oauth: GoogleOAuth,
    extra_data: Option<String>,
    rest_endpoint: String,
}

/// String member at `pointer`, `None` when absent or not a string
fn lookup(response: &Value, pointer: &str) -> Option<String> {
    response
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl OrkutAuth {
    pub fn new(config: &OrkutConfig, endpoints: &OAuthConfig) -> Result<Self> {
        let scope = ORKUT_SCOPE
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_scope.iter().cloned())
            .collect();

        let oauth = GoogleOAuth::new(
            Consumer::new(&config.consumer_key, &config.consumer_secret),
            endpoints.clone(),
            scope,
        )?;

        Ok(Self {
            oauth,
            extra_data: config
                .extra_data
                .as_ref()
                .map(|fields| fields.trim().to_string())
                .filter(|fields| !fields.is_empty()),
            rest_endpoint: config.rest_endpoint.clone(),
        })
    }

    /// Default person fields followed by any configured extras
    pub fn fields(&self) -> String {
        match &self.extra_data {
            Some(extra) => format!("{},{}", ORKUT_DEFAULT_DATA, extra),
            None => ORKUT_DEFAULT_DATA.to_string(),
        }
    }

    /// RPC parameters for a `people.get` call on the authenticated user
    pub fn user_data_params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("method".to_string(), "people.get".to_string()),
            ("id".to_string(), "myself".to_string()),
            ("userId".to_string(), "@me".to_string()),
            ("groupId".to_string(), "@self".to_string()),
            ("fields".to_string(), self.fields()),
            ("scope".to_string(), self.oauth.scope()),
        ])
    }
}

/// Pull the `data` member out of an RPC response body.
///
/// Bodies that are not JSON, or lack a non-null `data` member, yield `None`.
pub fn parse_user_data(body: &str) -> Option<Value> {
    let mut envelope: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Orkut response is not valid JSON");
            return None;
        }
    };

    envelope
        .get_mut("data")
        .map(Value::take)
        .filter(|data| !data.is_null())
}

#[async_trait]
impl AuthBackend for OrkutAuth {
    fn name(&self) -> &'static str {
        ORKUT_BACKEND_NAME
    }

    fn enabled(&self) -> bool {
        self.oauth.consumer().is_configured()
    }

    async fn unauthorized_token(&self, callback_url: &str) -> Result<Token, OAuthError> {
        self.oauth.unauthorized_token(callback_url).await
    }

    fn auth_url(&self, token: &Token, callback_url: &str) -> Result<String, OAuthError> {
        self.oauth.auth_url(token, callback_url)
    }

    async fn access_token(
        &self,
        token: &Token,
        verifier: Option<&str>,
    ) -> Result<Token, OAuthError> {
        self.oauth.access_token(token, verifier).await
    }

    async fn user_data(&self, access_token: &Token) -> Result<Option<Value>, OAuthError> {
        let request = self.oauth.oauth_request(
            Some(access_token),
            &self.rest_endpoint,
            self.user_data_params(),
        )?;
        let body = self.oauth.fetch(&request).await?;

        let data = parse_user_data(&body);
        if data.is_none() {
            debug!(backend = ORKUT_BACKEND_NAME, "No user data in Orkut response");
        }

        Ok(data)
    }

    fn get_user_details(&self, response: &Value) -> UserDetails {
        let display_name = lookup(response, "/displayName");

        UserDetails {
            username: display_name.clone(),
            email: lookup(response, "/emails/0/value"),
            fullname: display_name,
            firstname: lookup(response, "/name/givenName"),
            lastname: lookup(response, "/name/familyName"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::base::auth_complete;
    use crate::backends::google::tests::{accounts_router, endpoints_for, spawn_server};
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::net::SocketAddr;

    fn orkut_config(extra_data: Option<&str>, extra_scope: &[&str]) -> OrkutConfig {
        OrkutConfig {
            consumer_key: "consumer".to_string(),
            consumer_secret: "consumer-secret".to_string(),
            extra_data: extra_data.map(str::to_string),
            extra_scope: extra_scope.iter().map(|s| s.to_string()).collect(),
            rest_endpoint: ORKUT_REST_ENDPOINT.to_string(),
        }
    }

    fn sample_person() -> Value {
        json!({
            "id": "01234567890123456789",
            "displayName": "Jane Doe",
            "name": {"givenName": "Jane", "familyName": "Doe"},
            "emails": [
                {"value": "jane@example.com", "type": "home"},
                {"value": "jane@work.example.com", "type": "work"}
            ]
        })
    }

    #[test]
    fn test_default_params() {
        let orkut = OrkutAuth::new(&orkut_config(None, &[]), &OAuthConfig::default()).unwrap();
        let params = orkut.user_data_params();

        assert_eq!(params["method"], "people.get");
        assert_eq!(params["id"], "myself");
        assert_eq!(params["userId"], "@me");
        assert_eq!(params["groupId"], "@self");
        assert_eq!(params["fields"], "name,displayName,emails");
        assert_eq!(params["scope"], "http://orkut.gmodules.com/social/");
        assert_eq!(params.len(), 6);
    }

    #[test]
    fn test_extra_data_appended_to_defaults() {
        let orkut = OrkutAuth::new(
            &orkut_config(Some("gender,birthday"), &[]),
            &OAuthConfig::default(),
        )
        .unwrap();

        assert_eq!(orkut.fields(), "name,displayName,emails,gender,birthday");
    }

    #[test]
    fn test_blank_extra_data_ignored() {
        let orkut = OrkutAuth::new(&orkut_config(Some("  "), &[]), &OAuthConfig::default()).unwrap();
        assert_eq!(orkut.fields(), ORKUT_DEFAULT_DATA);
    }

    #[test]
    fn test_extra_scope_appended_to_defaults() {
        let orkut = OrkutAuth::new(
            &orkut_config(None, &["http://www.google.com/m8/feeds/", "https://mail.google.com/"]),
            &OAuthConfig::default(),
        )
        .unwrap();

        assert_eq!(
            orkut.user_data_params()["scope"],
            "http://orkut.gmodules.com/social/ http://www.google.com/m8/feeds/ https://mail.google.com/"
        );
    }

    #[test]
    fn test_enabled_requires_credentials() {
        let orkut = OrkutAuth::new(&orkut_config(None, &[]), &OAuthConfig::default()).unwrap();
        assert!(orkut.enabled());

        let orkut = OrkutAuth::new(&OrkutConfig::default(), &OAuthConfig::default()).unwrap();
        assert!(!orkut.enabled());
        assert_eq!(orkut.name(), "orkut");
    }

    #[test]
    fn test_parse_user_data() {
        let body = json!({"data": sample_person()}).to_string();
        assert_eq!(parse_user_data(&body), Some(sample_person()));
    }

    #[test]
    fn test_parse_user_data_malformed_json() {
        assert_eq!(parse_user_data("<html>Service unavailable</html>"), None);
        assert_eq!(parse_user_data(""), None);
        assert_eq!(parse_user_data("{\"data\": "), None);
    }

    #[test]
    fn test_parse_user_data_missing_key() {
        assert_eq!(parse_user_data(r#"{"error": {"code": 401}}"#), None);
        assert_eq!(parse_user_data(r#"{"data": null}"#), None);
        assert_eq!(parse_user_data(r#"[{"data": {}}]"#), None);
    }

    #[test]
    fn test_get_user_details() {
        let orkut = OrkutAuth::new(&orkut_config(None, &[]), &OAuthConfig::default()).unwrap();
        let details = orkut.get_user_details(&sample_person());

        assert_eq!(
            details,
            UserDetails {
                username: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                fullname: Some("Jane Doe".to_string()),
                firstname: Some("Jane".to_string()),
                lastname: Some("Doe".to_string()),
            }
        );
        assert!(details.is_complete());
    }

    #[test]
    fn test_get_user_details_partial() {
        let orkut = OrkutAuth::new(&orkut_config(None, &[]), &OAuthConfig::default()).unwrap();
        let details = orkut.get_user_details(&json!({
            "displayName": "Jane Doe",
            "emails": []
        }));

        assert_eq!(details.username.as_deref(), Some("Jane Doe"));
        assert_eq!(details.fullname.as_deref(), Some("Jane Doe"));
        assert!(details.email.is_none());
        assert!(details.firstname.is_none());
        assert!(details.lastname.is_none());
    }

    #[test]
    fn test_get_user_details_unexpected_shape() {
        let orkut = OrkutAuth::new(&orkut_config(None, &[]), &OAuthConfig::default()).unwrap();
        let details = orkut.get_user_details(&json!({
            "displayName": 12,
            "name": {"givenName": "Jane", "familyName": null}
        }));

        assert!(details.username.is_none());
        assert!(details.fullname.is_none());
        assert!(details.email.is_none());
        assert_eq!(details.firstname.as_deref(), Some("Jane"));
        assert!(details.lastname.is_none());
    }

    #[test]
    fn test_get_user_details_ignores_unmapped_members() {
        let orkut = OrkutAuth::new(&orkut_config(None, &[]), &OAuthConfig::default()).unwrap();
        let details = orkut.get_user_details(&json!({
            "id": 42,
            "displayName": "Jane Doe",
            "name": {"givenName": "Jane", "familyName": "Doe", "formatted": 7},
            "emails": [{"value": "jane@example.com"}, null],
            "thumbnailUrl": 3
        }));

        assert!(details.is_complete());
        assert_eq!(details.username.as_deref(), Some("Jane Doe"));
        assert_eq!(details.email.as_deref(), Some("jane@example.com"));
        assert_eq!(details.lastname.as_deref(), Some("Doe"));
    }

    const DEFAULT_SCOPE: &str = "http://orkut.gmodules.com/social/";

    /// Fake RPC endpoint answering people.get calls with `body`.
    /// Requests with other `fields` or `scope` values are rejected.
    fn rpc_router(body: &'static str, fields: &'static str, scope: &'static str) -> Router {
        Router::new().route(
            "/social/rpc",
            get(move |Query(q): Query<HashMap<String, String>>| async move {
                let valid = q.get("method").map(String::as_str) == Some("people.get")
                    && q.get("id").map(String::as_str) == Some("myself")
                    && q.get("userId").map(String::as_str) == Some("@me")
                    && q.get("groupId").map(String::as_str) == Some("@self")
                    && q.get("fields").map(String::as_str) == Some(fields)
                    && q.get("scope").map(String::as_str) == Some(scope)
                    && q.get("oauth_token").map(String::as_str) == Some("access-token")
                    && q.contains_key("oauth_signature");
                if valid {
                    (StatusCode::OK, body)
                } else {
                    (StatusCode::UNAUTHORIZED, "unauthorized")
                }
            }),
        )
    }

    fn orkut_against(addr: SocketAddr, extra_data: Option<&str>, extra_scope: &[&str]) -> OrkutAuth {
        let mut config = orkut_config(extra_data, extra_scope);
        config.rest_endpoint = format!("http://{}/social/rpc", addr);
        OrkutAuth::new(&config, &endpoints_for(addr)).unwrap()
    }

    #[tokio::test]
    async fn test_user_data() {
        let addr = spawn_server(rpc_router(
            r#"{"data": {"id": "42", "displayName": "Jane Doe"}}"#,
            ORKUT_DEFAULT_DATA,
            DEFAULT_SCOPE,
        ))
        .await;

        let data = orkut_against(addr, None, &[])
            .user_data(&Token::new("access-token", "access-secret"))
            .await
            .unwrap();

        assert_eq!(data, Some(json!({"id": "42", "displayName": "Jane Doe"})));
    }

    #[tokio::test]
    async fn test_user_data_malformed_body_is_none() {
        let addr =
            spawn_server(rpc_router("not json at all", ORKUT_DEFAULT_DATA, DEFAULT_SCOPE)).await;

        let data = orkut_against(addr, None, &[])
            .user_data(&Token::new("access-token", "access-secret"))
            .await
            .unwrap();

        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_user_data_http_error_propagates() {
        let addr = spawn_server(rpc_router("{}", ORKUT_DEFAULT_DATA, DEFAULT_SCOPE)).await;

        let result = orkut_against(addr, None, &[])
            .user_data(&Token::new("someone-else", "secret"))
            .await;

        assert!(matches!(result, Err(OAuthError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_user_data_sends_extras_after_defaults() {
        let addr = spawn_server(rpc_router(
            r#"{"data": {"id": "42"}}"#,
            "name,displayName,emails,gender,birthday",
            "http://orkut.gmodules.com/social/ http://www.google.com/m8/feeds/",
        ))
        .await;

        let orkut = orkut_against(
            addr,
            Some("gender,birthday"),
            &["http://www.google.com/m8/feeds/"],
        );
        let data = orkut
            .user_data(&Token::new("access-token", "access-secret"))
            .await
            .unwrap();

        assert_eq!(data, Some(json!({"id": "42"})));
    }

    #[tokio::test]
    async fn test_user_data_without_extras_rejected_by_extras_endpoint() {
        let addr = spawn_server(rpc_router(
            r#"{"data": {"id": "42"}}"#,
            "name,displayName,emails,gender",
            DEFAULT_SCOPE,
        ))
        .await;

        let result = orkut_against(addr, None, &[])
            .user_data(&Token::new("access-token", "access-secret"))
            .await;

        assert!(matches!(result, Err(OAuthError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_full_flow() {
        let scope = "http://orkut.gmodules.com/social/ http://www.google.com/m8/feeds/";
        let router = accounts_router(scope).merge(rpc_router(
            r#"{"data": {"id": "42", "displayName": "Jane Doe", "name": {"givenName": "Jane", "familyName": "Doe"}, "emails": [{"value": "jane@example.com"}]}}"#,
            "name,displayName,emails,gender",
            scope,
        ));
        let addr = spawn_server(router).await;
        let orkut = orkut_against(addr, Some("gender"), &["http://www.google.com/m8/feeds/"]);

        let request_token = orkut
            .unauthorized_token("http://localhost/complete/orkut?session=abc")
            .await
            .unwrap();
        let auth_url = orkut
            .auth_url(&request_token, "http://localhost/complete/orkut?session=abc")
            .unwrap();
        assert!(auth_url.contains("oauth_token=request-token"));

        let result = auth_complete(&orkut, &request_token, "request-token", Some("verifier"))
            .await
            .unwrap();

        assert_eq!(result.backend, "orkut");
        assert_eq!(result.uid, "42");
        assert_eq!(result.details.email.as_deref(), Some("jane@example.com"));
        assert_eq!(result.details.lastname.as_deref(), Some("Doe"));
        assert_eq!(
            result.extra_data["access_token"],
            "oauth_token=access-token&oauth_token_secret=access-secret"
        );
    }
}
