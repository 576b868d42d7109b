use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, as used for `oauth_timestamp`
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

pub fn is_expired(timestamp: i64, ttl: i64, current_time: i64) -> bool {
    current_time - timestamp > ttl
}
