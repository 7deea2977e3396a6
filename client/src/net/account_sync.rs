//! Keeps one widget's linked-account list in step with the server.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AccountSync` owns the widget's `RwSignal<AccountsState>` and drives it
//! through three operations: `refresh` (read), `connect` (OAuth popup) and
//! `disconnect` (unlink). Mutations never touch the list directly; they
//! finish by re-fetching it.
//!
//! Network access goes through [`AccountsApi`] and popups through
//! [`PopupLauncher`] so the flow runs identically against the browser
//! implementations and in-memory fakes.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch is logged and leaves the list as it was. A failed unlink
//! or a blocked popup is logged and surfaced through `AccountsState::notice`.
//! Nothing is retried.
//!
//! TRADE-OFFS
//! ==========
//! Overlapping refreshes are not ordered: whichever response settles last
//! defines the list.

#[cfg(test)]
#[path = "account_sync_test.rs"]
mod account_sync_test;

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;

use super::api::{AccountsApi, ApiError, oauth_connect_endpoint};
use super::oauth_popup::{CompletionSignal, PopupLauncher};
use super::types::LinkedAccount;
use crate::state::accounts::AccountsState;

fn disconnect_failed_notice(display_name: &str) -> String {
    format!("Could not disconnect {display_name}.")
}

fn popup_blocked_notice() -> String {
    "Could not open the sign-in window. Allow popups for this site and try again.".to_owned()
}

/// Account-list synchronizer for a single provider.
pub struct AccountSync<A, P> {
    provider: Arc<str>,
    state: RwSignal<AccountsState>,
    api: Arc<A>,
    popup: Arc<P>,
}

impl<A, P> Clone for AccountSync<A, P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            state: self.state,
            api: Arc::clone(&self.api),
            popup: Arc::clone(&self.popup),
        }
    }
}

impl<A, P> AccountSync<A, P>
where
    A: AccountsApi + 'static,
    P: PopupLauncher + 'static,
{
    /// Build a synchronizer together with its initial fetch.
    ///
    /// The returned future is the first `refresh`; callers spawn it right
    /// away so a freshly mounted widget issues exactly one read.
    pub fn start(provider: impl Into<String>, api: A, popup: P) -> (Self, impl Future<Output = ()> + 'static) {
        let sync = Self {
            provider: Arc::from(provider.into()),
            state: RwSignal::new(AccountsState::default()),
            api: Arc::new(api),
            popup: Arc::new(popup),
        };
        let initial = {
            let sync = sync.clone();
            async move {
                let _ = sync.refresh().await;
            }
        };
        (sync, initial)
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<AccountsState> {
        self.state
    }

    /// Re-read the provider's account list.
    ///
    /// # Errors
    ///
    /// Returns the transport error after logging it; the list is unchanged.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.state.update(AccountsState::begin_fetch);
        match self.api.list_accounts(&self.provider).await {
            Ok(accounts) => {
                self.state.update(|s| s.apply_fetch_success(accounts));
                Ok(())
            }
            Err(e) => {
                leptos::logging::warn!("linked accounts fetch failed for {}: {e}", self.provider);
                self.state.update(AccountsState::apply_fetch_failure);
                Err(e)
            }
        }
    }

    /// Register a completion for a new request id, then open the OAuth popup.
    ///
    /// Returns the request id the popup was opened with. Nothing happens to
    /// the list until the popup reports completion; a popup that never
    /// reports stays pending until newer requests evict it.
    ///
    /// # Errors
    ///
    /// Returns an error if the popup could not be opened. The registration
    /// is withdrawn and a notice is set.
    pub fn connect(&self) -> Result<String, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.state.update(|s| s.pending.register(request_id.clone()));

        let url = oauth_connect_endpoint(&self.provider, &request_id);
        if let Err(e) = self.popup.open_popup(&url) {
            leptos::logging::warn!("oauth popup for {} failed: {e}", self.provider);
            self.state.update(|s| {
                s.pending.cancel(&request_id);
                s.notice = Some(popup_blocked_notice());
            });
            return Err(e);
        }
        Ok(request_id)
    }

    /// Route a popup completion to this widget.
    ///
    /// Refreshes once and returns `true` if the signal resolved one of this
    /// widget's pending requests; otherwise ignores it.
    pub async fn handle_completion(&self, signal: &CompletionSignal) -> bool {
        let resolved = self
            .state
            .try_update(|s| match signal {
                CompletionSignal::Correlated(request_id) => s.pending.resolve(request_id),
                CompletionSignal::Legacy => s.pending.resolve_legacy().is_some(),
            })
            .unwrap_or(false);
        if !resolved {
            return false;
        }
        let _ = self.refresh().await;
        true
    }

    /// Unlink `account`, then re-fetch the list.
    ///
    /// # Errors
    ///
    /// Returns the delete error after logging it and setting a notice. No
    /// refresh runs in that case.
    pub async fn disconnect(&self, account: &LinkedAccount) -> Result<(), ApiError> {
        if let Err(e) = self.api.delete_account(&account.id).await {
            leptos::logging::warn!("disconnect of account {} failed: {e}", account.id);
            let notice = disconnect_failed_notice(&account.display_name);
            self.state.update(|s| s.notice = Some(notice));
            return Err(e);
        }
        // Refresh failures are logged inside `refresh`.
        let _ = self.refresh().await;
        Ok(())
    }
}
