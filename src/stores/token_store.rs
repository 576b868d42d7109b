use crate::oauth::token::Token;
use crate::utils::time::is_expired;
use dashmap::DashMap;

/// Request token waiting for the user to come back from the provider
#[derive(Clone, Debug)]
pub struct PendingToken {
    pub backend: String,
    pub token: Token,
    pub created_at: i64,
}

impl PendingToken {
    pub fn new(backend: &str, token: Token, created_at: i64) -> Self {
        Self {
            backend: backend.to_string(),
            token,
            created_at,
        }
    }
}

/// In-memory store for pending logins, keyed by session id
pub struct TokenStore {
    tokens: DashMap<String, PendingToken>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// Store a pending token. An entry with the same session id is replaced.
    pub fn insert(&self, session_id: String, pending: PendingToken) {
        self.tokens.insert(session_id, pending);
    }

    /// Remove and return the pending token for `session_id`.
    /// Expired entries are dropped and reported as missing.
    pub fn take(&self, session_id: &str, ttl: i64, current_time: i64) -> Option<PendingToken> {
        let (_, pending) = self.tokens.remove(session_id)?;

        if is_expired(pending.created_at, ttl, current_time) {
            return None;
        }

        Some(pending)
    }

    /// Drop entries older than `ttl`, returning how many were removed
    pub fn cleanup_expired(&self, ttl: i64, current_time: i64) -> usize {
        let before = self.tokens.len();
        self.tokens
            .retain(|_, pending| !is_expired(pending.created_at, ttl, current_time));
        before.saturating_sub(self.tokens.len())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
