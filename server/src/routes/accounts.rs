//! Settings API for linked external accounts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use client::net::types::AccountsResponse;
use serde::Serialize;

use crate::services::accounts::{AccountError, ExternalAccount};
use crate::state::AppState;

pub(crate) fn account_error_to_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::NotFound(_) => StatusCode::NOT_FOUND,
        AccountError::InvalidIdentity => StatusCode::BAD_REQUEST,
    }
}

#[derive(Debug, Serialize)]
pub struct UnlinkResponse {
    pub ok: bool,
}

/// `GET /api/v1/settings/{provider}/accounts/`: accounts linked for a provider.
pub async fn list_provider_accounts(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Json<AccountsResponse> {
    let accounts = state
        .accounts
        .list_for_provider(&provider)
        .await
        .iter()
        .map(ExternalAccount::to_linked)
        .collect();
    Json(AccountsResponse { accounts })
}

/// `DELETE /api/v1/oauth/accounts/{id}/`: unlink one account.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UnlinkResponse>, StatusCode> {
    let removed = state.accounts.unlink(&id).await.map_err(|e| {
        tracing::warn!(error = %e, "unlink failed");
        account_error_to_status(&e)
    })?;
    tracing::info!(account_id = %removed.id, provider = %removed.provider, "account unlinked");
    Ok(Json(UnlinkResponse { ok: true }))
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
