//! Linked-account list state for the third-party account widget.
//!
//! DESIGN
//! ======
//! The list is never edited in place: every completed fetch clears and
//! refills it, and mutating actions only schedule another fetch. Pending
//! OAuth popups are tracked here by correlation id so a completion can be
//! routed back to the widget that opened it.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod accounts_test;

use crate::net::types::LinkedAccount;

/// Whether a list fetch is outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Idle,
    Fetching,
}

/// Most popups one widget tracks at once. Abandoned popups never report
/// back, so the oldest id is dropped to make room.
pub const MAX_PENDING_CONNECTS: usize = 8;

/// OAuth popups opened by one widget that have not reported completion.
///
/// Correlated completions resolve their own id. The untokened legacy hook
/// only ever points at the most recent request, matching a single global
/// callback slot that each connect overwrites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingConnects {
    requests: Vec<String>,
    legacy_hook: Option<String>,
}

impl PendingConnects {
    /// Track a newly opened popup and point the legacy hook at it.
    pub fn register(&mut self, request_id: String) {
        if self.requests.len() >= MAX_PENDING_CONNECTS {
            self.requests.remove(0);
        }
        self.legacy_hook = Some(request_id.clone());
        self.requests.push(request_id);
    }

    /// Resolve a correlated completion. Returns `false` for unknown or
    /// already-resolved ids.
    pub fn resolve(&mut self, request_id: &str) -> bool {
        let Some(pos) = self.requests.iter().position(|id| id == request_id) else {
            return false;
        };
        self.requests.remove(pos);
        if self.legacy_hook.as_deref() == Some(request_id) {
            self.legacy_hook = None;
        }
        true
    }

    /// Fire the legacy hook once, resolving whichever request installed it last.
    pub fn resolve_legacy(&mut self) -> Option<String> {
        let request_id = self.legacy_hook.take()?;
        self.requests.retain(|id| *id != request_id);
        Some(request_id)
    }

    /// Forget a request whose popup never opened.
    pub fn cancel(&mut self, request_id: &str) {
        self.requests.retain(|id| id != request_id);
        if self.legacy_hook.as_deref() == Some(request_id) {
            self.legacy_hook = None;
        }
    }

    #[must_use]
    pub fn is_pending(&self, request_id: &str) -> bool {
        self.requests.iter().any(|id| id == request_id)
    }

    #[must_use]
    pub fn legacy_target(&self) -> Option<&str> {
        self.legacy_hook.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Observable account list plus bookkeeping for one widget instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountsState {
    /// Accounts from the most recently completed successful fetch.
    pub accounts: Vec<LinkedAccount>,
    /// Fetches issued but not yet settled. Refreshes may overlap.
    pub in_flight: u32,
    /// User-visible message for failures the widget reports.
    pub notice: Option<String>,
    pub pending: PendingConnects,
}

impl AccountsState {
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        if self.in_flight > 0 { SyncPhase::Fetching } else { SyncPhase::Idle }
    }

    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    /// Replace the whole list with `accounts`, keeping server order.
    pub fn apply_fetch_success(&mut self, accounts: Vec<LinkedAccount>) {
        self.end_fetch();
        self.accounts.clear();
        self.accounts.extend(accounts);
        self.notice = None;
    }

    /// Settle a failed fetch. The list keeps its prior contents.
    pub fn apply_fetch_failure(&mut self) {
        self.end_fetch();
    }

    fn end_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
