//! HMAC-SHA1 request signing as described in RFC 5849, section 3.4.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use url::Url;

use crate::core::error::OAuthError;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Everything except the RFC 3986 unreserved characters gets escaped
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Scheme, host, non-default port and path. Query and fragment are dropped.
pub fn normalize_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();

    // Url::port() already reports None for the scheme's default port
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

/// Encode, sort and join parameters. `oauth_signature` never takes part.
pub fn normalize_parameters(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .filter(|(key, _)| key != "oauth_signature")
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();

    encoded.sort();

    encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn signature_base_string(method: &str, url: &Url, params: &[(String, String)]) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&normalize_url(url)),
        percent_encode(&normalize_parameters(params))
    )
}

pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    )
}

pub fn hmac_sha1_signature(base_string: &str, key: &str) -> Result<String, OAuthError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| OAuthError::Signature(e.to_string()))?;
    mac.update(base_string.as_bytes());

    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}
