//! OAuth popup plumbing: state tokens, authorize URLs, completion page.
//!
//! ARCHITECTURE
//! ============
//! The widget opens `/oauth/connect/{provider}/?request_id=..` in a popup.
//! The request id travels through the provider round trip inside the OAuth
//! `state` parameter (mirrored in an HttpOnly cookie), so the completion page
//! can echo it back to exactly the widget that asked.
//!
//! State encoding:
//! - `req.<request_id>` for correlated requests
//! - `anon.<hex>` when the opener supplied no request id
//!
//! Each state gets its own cookie (`oauth_state_<id>`) so concurrent popups
//! do not overwrite each other's CSRF check.
//!
//! The completion redirect comes from the token-exchange service, through the
//! browser. Its identity fields are only trusted when they carry an
//! HMAC-SHA256 signature made with the provider's completion secret over
//! `state|provider_id|display_name`.

use std::fmt::Write;

use client::net::types::OAuthCompleteMessage;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use url::Url;

use crate::config::ProviderConfig;
use crate::services::claim::{escape_html, fill_template};

const COMPLETE_TEMPLATE: &str = include_str!("../../templates/oauth_complete.html");
const MAX_REQUEST_ID_LEN: usize = 64;
const CORRELATED_PREFIX: &str = "req.";
const ANONYMOUS_PREFIX: &str = "anon.";
const STATE_COOKIE_PREFIX: &str = "oauth_state_";
const SIGNATURE_SEPARATOR: char = '|';

type HmacSha256 = Hmac<Sha256>;

/// Generate a random 16-byte hex token.
#[must_use]
pub fn generate_state_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Trim and validate a request id (`[A-Za-z0-9-]`, at most 64 chars).
#[must_use]
pub fn normalize_request_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.len() > MAX_REQUEST_ID_LEN
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return None;
    }
    Some(trimmed.to_owned())
}

/// OAuth `state` carried through the provider round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthState {
    Correlated(String),
    Anonymous(String),
}

impl OAuthState {
    /// State for a new connect request. `request_id` must already be normalized.
    #[must_use]
    pub fn for_request(request_id: Option<String>) -> Self {
        match request_id {
            Some(id) => Self::Correlated(id),
            None => Self::Anonymous(generate_state_token()),
        }
    }

    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Correlated(id) => format!("{CORRELATED_PREFIX}{id}"),
            Self::Anonymous(token) => format!("{ANONYMOUS_PREFIX}{token}"),
        }
    }

    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        if let Some(id) = raw.strip_prefix(CORRELATED_PREFIX) {
            return normalize_request_id(id).filter(|n| n == id).map(Self::Correlated);
        }
        raw.strip_prefix(ANONYMOUS_PREFIX)
            .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_hexdigit()))
            .map(|t| Self::Anonymous(t.to_owned()))
    }

    /// Name of the cookie that mirrors this state.
    #[must_use]
    pub fn cookie_name(&self) -> String {
        match self {
            Self::Correlated(key) | Self::Anonymous(key) => format!("{STATE_COOKIE_PREFIX}{key}"),
        }
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Correlated(id) => Some(id),
            Self::Anonymous(_) => None,
        }
    }
}

/// Provider authorization URL for `state`.
///
/// # Errors
///
/// Returns an error if the configured authorize URL does not parse.
pub fn authorize_url(provider: &ProviderConfig, state: &OAuthState) -> Result<String, url::ParseError> {
    let encoded_state = state.encode();
    let mut params = vec![
        ("client_id", provider.client_id.as_str()),
        ("redirect_uri", provider.redirect_uri.as_str()),
        ("response_type", "code"),
    ];
    if let Some(scope) = provider.scope.as_deref() {
        params.push(("scope", scope));
    }
    params.push(("state", encoded_state.as_str()));
    Ok(Url::parse_with_params(&provider.authorize_url, &params)?.into())
}

fn completion_mac(secret: &str, state: &str, provider_id: &str, display_name: &str) -> Option<HmacSha256> {
    // `state` never contains the separator; `provider_id` must not either,
    // or two different identities could share one signed message.
    if provider_id.contains(SIGNATURE_SEPARATOR) {
        return None;
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{state}{SIGNATURE_SEPARATOR}{provider_id}{SIGNATURE_SEPARATOR}{display_name}").as_bytes());
    Some(mac)
}

/// Hex HMAC-SHA256 the token-exchange service attaches to a completion redirect.
///
/// Returns `None` when `provider_id` contains `|`. The server only verifies;
/// signing lives here for tests.
#[cfg(test)]
#[must_use]
pub fn sign_completion(secret: &str, state: &str, provider_id: &str, display_name: &str) -> Option<String> {
    let mac = completion_mac(secret, state, provider_id, display_name)?;
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Check a completion signature in constant time.
#[must_use]
pub fn verify_completion(secret: &str, state: &str, provider_id: &str, display_name: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    completion_mac(secret, state, provider_id, display_name).is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

/// JSON for embedding in an inline `<script>` without closing it early.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c").replace('>', "\\u003e").replace('&', "\\u0026")
}

/// Render the popup page that reports completion to its opener.
///
/// With a request id it posts an `oauth_complete` message carrying that id;
/// without one it calls the opener's global `oauth_complete()` hook.
#[must_use]
pub fn render_completion_page(display_name: &str, request_id: Option<&str>) -> String {
    let message = request_id
        .map(|id| {
            // The opener expects the message as a JSON string, not an object.
            let payload = serde_json::to_string(&OAuthCompleteMessage::correlated(id)).unwrap_or_default();
            script_safe_json(&serde_json::Value::String(payload).to_string())
        })
        .unwrap_or_else(|| "null".to_owned());
    let display_name = escape_html(display_name);
    fill_template(COMPLETE_TEMPLATE, &[("DISPLAY_NAME", &display_name), ("MESSAGE", &message)])
}

#[cfg(test)]
#[path = "oauth_test.rs"]
mod tests;
