//! REST API helpers for the linked-accounts settings endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics so fetch failures degrade
//! the widget (stale list, logged diagnostic) without crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use super::types::LinkedAccount;
#[cfg(feature = "hydrate")]
use super::types::AccountsResponse;

/// Failures surfaced by the settings API and the popup bridge.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (network, CORS, aborted).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body did not match the expected schema.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The browser refused to open the OAuth popup.
    #[error("popup blocked")]
    PopupBlocked,

    /// Browser-only call attempted during server rendering.
    #[error("not available on server")]
    Unavailable,
}

/// `GET` endpoint listing the accounts linked for one provider.
#[must_use]
pub fn provider_accounts_endpoint(provider: &str) -> String {
    format!("/api/v1/settings/{provider}/accounts/")
}

/// `DELETE` endpoint for a single linked account.
#[must_use]
pub fn account_resource_endpoint(account_id: &str) -> String {
    format!("/api/v1/oauth/accounts/{account_id}/")
}

/// Path the OAuth popup is pointed at.
#[must_use]
pub fn oauth_connect_path(provider: &str) -> String {
    format!("/oauth/connect/{provider}/")
}

/// Popup URL carrying the correlation id echoed back on completion.
#[must_use]
pub fn oauth_connect_endpoint(provider: &str, request_id: &str) -> String {
    format!("{}?request_id={request_id}", oauth_connect_path(provider))
}

/// Read/unlink operations the account synchronizer depends on.
pub trait AccountsApi {
    /// List the accounts linked for `provider`, in server order.
    fn list_accounts(&self, provider: &str) -> impl Future<Output = Result<Vec<LinkedAccount>, ApiError>>;

    /// Unlink the account identified by `account_id`.
    fn delete_account(&self, account_id: &str) -> impl Future<Output = Result<(), ApiError>>;
}

/// [`AccountsApi`] backed by the same-origin REST endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpAccountsApi;

impl AccountsApi for HttpAccountsApi {
    async fn list_accounts(&self, provider: &str) -> Result<Vec<LinkedAccount>, ApiError> {
        fetch_linked_accounts(provider).await
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), ApiError> {
        delete_linked_account(account_id).await
    }
}

/// Fetch linked accounts from `/api/v1/settings/{provider}/accounts/`.
///
/// # Errors
///
/// Returns an error if the request fails, the server responds with a non-OK
/// status, or the body is not an `{ accounts: [...] }` document.
pub async fn fetch_linked_accounts(provider: &str) -> Result<Vec<LinkedAccount>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = provider_accounts_endpoint(provider);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !resp.ok() {
            return Err(ApiError::Status { endpoint: url, status: resp.status() });
        }
        let body: AccountsResponse = resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(body.accounts)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = provider;
        Err(ApiError::Unavailable)
    }
}

/// Unlink an account via `DELETE /api/v1/oauth/accounts/{id}/`.
///
/// # Errors
///
/// Returns an error if the request fails or the server responds with a
/// non-OK status. The response body is ignored.
pub async fn delete_linked_account(account_id: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = account_resource_endpoint(account_id);
        let resp = gloo_net::http::Request::delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !resp.ok() {
            return Err(ApiError::Status { endpoint: url, status: resp.status() });
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = account_id;
        Err(ApiError::Unavailable)
    }
}
