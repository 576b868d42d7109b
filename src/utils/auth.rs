/// Compare two tokens in constant time
///
/// Used when matching the `oauth_token` a provider sends back against the
/// request token stored for the pending login.
pub fn verify_token(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .as_bytes()
            .iter()
            .zip(expected.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Random identifier for a pending login, carried through the OAuth callback
pub fn generate_session_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
