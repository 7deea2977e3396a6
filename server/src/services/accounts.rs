//! Linked external-account store.
//!
//! DESIGN
//! ======
//! Accounts live in memory behind a single `RwLock`, in link order. The pair
//! `(provider, provider_id)` identifies an external identity; linking the same
//! identity again refreshes its display name and keeps its id and position.

use std::sync::Arc;

use client::net::types::LinkedAccount;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("account not found: {0}")]
    NotFound(String),
    #[error("invalid external identity")]
    InvalidIdentity,
}

/// Server-side record behind a [`LinkedAccount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAccount {
    pub id: Uuid,
    pub provider: String,
    /// Human-readable provider name at link time (e.g. "Zotero").
    pub provider_name: String,
    /// Identifier assigned by the provider (e.g. a Zotero user id).
    pub provider_id: String,
    pub display_name: String,
}

impl ExternalAccount {
    #[must_use]
    pub fn to_linked(&self) -> LinkedAccount {
        LinkedAccount { display_name: self.display_name.clone(), id: self.id.to_string() }
    }
}

#[derive(Clone, Default)]
pub struct AccountStore {
    accounts: Arc<RwLock<Vec<ExternalAccount>>>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts linked for `provider`, in link order.
    pub async fn list_for_provider(&self, provider: &str) -> Vec<ExternalAccount> {
        let accounts = self.accounts.read().await;
        accounts.iter().filter(|a| a.provider == provider).cloned().collect()
    }

    /// Link an external identity, or refresh the display name of an existing link.
    ///
    /// A blank display name falls back to the provider id. Re-linking also
    /// refreshes the stored provider name.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidIdentity`] when `provider` or
    /// `provider_id` is blank.
    pub async fn link(
        &self,
        provider: &str,
        provider_name: &str,
        provider_id: &str,
        display_name: &str,
    ) -> Result<ExternalAccount, AccountError> {
        let provider = provider.trim();
        let provider_id = provider_id.trim();
        if provider.is_empty() || provider_id.is_empty() {
            return Err(AccountError::InvalidIdentity);
        }
        let display_name = match display_name.trim() {
            "" => provider_id,
            name => name,
        };

        let mut accounts = self.accounts.write().await;
        if let Some(existing) = accounts
            .iter_mut()
            .find(|a| a.provider == provider && a.provider_id == provider_id)
        {
            display_name.clone_into(&mut existing.display_name);
            provider_name.clone_into(&mut existing.provider_name);
            return Ok(existing.clone());
        }

        let account = ExternalAccount {
            id: Uuid::new_v4(),
            provider: provider.to_owned(),
            provider_name: provider_name.to_owned(),
            provider_id: provider_id.to_owned(),
            display_name: display_name.to_owned(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    /// Remove the account with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when `id` is not a UUID or matches
    /// no linked account.
    pub async fn unlink(&self, id: &str) -> Result<ExternalAccount, AccountError> {
        let parsed = Uuid::parse_str(id.trim()).map_err(|_| AccountError::NotFound(id.to_owned()))?;
        let mut accounts = self.accounts.write().await;
        let idx = accounts
            .iter()
            .position(|a| a.id == parsed)
            .ok_or_else(|| AccountError::NotFound(id.to_owned()))?;
        Ok(accounts.remove(idx))
    }
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
