//! Shared wire DTOs for the settings API and the OAuth popup bridge.
//!
//! DESIGN
//! ======
//! These types mirror the server's JSON payloads field for field so serde
//! stays lossless across the client/server boundary.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Message `type` tag posted by the OAuth completion page.
pub const OAUTH_COMPLETE_MESSAGE_TYPE: &str = "oauth_complete";

/// A third-party account linked to the current user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Human-readable name reported by the provider.
    pub display_name: String,
    /// Server-side account identifier, used for unlinking.
    pub id: String,
}

/// Body of `GET /api/v1/settings/{provider}/accounts/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<LinkedAccount>,
}

/// Structured message a completion popup posts to its opener.
///
/// `request_id` echoes the id passed to `/oauth/connect/{provider}/`; it is
/// absent when the completion page predates correlated requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCompleteMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl OAuthCompleteMessage {
    #[must_use]
    pub fn correlated(request_id: impl Into<String>) -> Self {
        Self { kind: OAUTH_COMPLETE_MESSAGE_TYPE.to_owned(), request_id: Some(request_id.into()) }
    }
}
