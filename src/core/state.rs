// Application state (AppState)

use crate::backends::registry::Registry;
use crate::core::config::Config;
use crate::stores::token_store::TokenStore;
use std::sync::Arc;

/// Shared application state
///
/// Handed to every request handler; all fields are behind Arc so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Login backends by name
    pub registry: Arc<Registry>,

    /// Request tokens for logins in progress
    pub token_store: Arc<TokenStore>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            token_store: Arc::new(TokenStore::new()),
            config: Arc::new(config),
        }
    }
}
