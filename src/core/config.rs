use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

use crate::backends::google::{
    GOOGLE_OAUTH_ACCESS_TOKEN_URL, GOOGLE_OAUTH_AUTHORIZATION_URL, GOOGLE_OAUTH_REQUEST_TOKEN_URL,
};
use crate::backends::orkut::ORKUT_REST_ENDPOINT;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub orkut: OrkutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    /// Externally reachable base URL, used to build OAuth callbacks
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Seconds an unauthorized request token stays valid
    #[serde(default = "default_pending_token_ttl")]
    pub pending_token_ttl: i64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_request_token_url")]
    pub request_token_url: String,
    #[serde(default = "default_authorization_url")]
    pub authorization_url: String,
    #[serde(default = "default_access_token_url")]
    pub access_token_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrkutConfig {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    /// Comma separated person fields requested on top of the defaults
    #[serde(default)]
    pub extra_data: Option<String>,
    #[serde(default)]
    pub extra_scope: Vec<String>,
    #[serde(default = "default_orkut_rest_endpoint")]
    pub rest_endpoint: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pending_token_ttl: default_pending_token_ttl(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            request_token_url: default_request_token_url(),
            authorization_url: default_authorization_url(),
            access_token_url: default_access_token_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for OrkutConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            extra_data: None,
            extra_scope: Vec::new(),
            rest_endpoint: default_orkut_rest_endpoint(),
        }
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

fn default_pending_token_ttl() -> i64 {
    600 // 10 minutes
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_request_token_url() -> String {
    GOOGLE_OAUTH_REQUEST_TOKEN_URL.to_string()
}

fn default_authorization_url() -> String {
    GOOGLE_OAUTH_AUTHORIZATION_URL.to_string()
}

fn default_access_token_url() -> String {
    GOOGLE_OAUTH_ACCESS_TOKEN_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_orkut_rest_endpoint() -> String {
    ORKUT_REST_ENDPOINT.to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        Url::parse(&self.server.public_url)
            .context(format!("Invalid public_url '{}'", self.server.public_url))?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        // Validate session config
        if self.session.cleanup_interval == 0 {
            bail!("cleanup_interval must be greater than 0");
        }

        if self.session.pending_token_ttl <= self.session.cleanup_interval as i64 {
            bail!(
                "pending_token_ttl ({}) must be greater than cleanup_interval ({})",
                self.session.pending_token_ttl,
                self.session.cleanup_interval
            );
        }

        // Validate OAuth endpoints
        for (name, value) in [
            ("request_token_url", &self.oauth.request_token_url),
            ("authorization_url", &self.oauth.authorization_url),
            ("access_token_url", &self.oauth.access_token_url),
            ("rest_endpoint", &self.orkut.rest_endpoint),
        ] {
            Url::parse(value).context(format!("Invalid {} '{}'", name, value))?;
        }

        if self.oauth.request_timeout == 0 {
            bail!("request_timeout must be greater than 0");
        }

        // Credentials are all-or-nothing
        if self.orkut.consumer_key.is_empty() != self.orkut.consumer_secret.is_empty() {
            bail!("orkut consumer_key and consumer_secret must be set together");
        }

        Ok(())
    }
}
