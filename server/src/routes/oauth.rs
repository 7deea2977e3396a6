//! OAuth popup routes: redirect to the provider, land the completion page.
//!
//! The token exchange with the provider happens elsewhere; the completion
//! route receives the resulting identity, checks the exchange service's
//! signature over it, and records the link.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::services::oauth::{self as oauth_svc, OAuthState};
use crate::state::AppState;

const STATE_COOKIE_TTL_MINUTES: i64 = 10;

fn state_cookie(name: String, value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    request_id: Option<String>,
}

/// `GET /oauth/connect/{provider}/`: redirect the popup to the provider.
pub async fn connect(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<ConnectQuery>,
) -> Response {
    let Some(config) = state.config.provider(&provider) else {
        return (StatusCode::NOT_FOUND, "unknown oauth provider").into_response();
    };

    let request_id = match params.request_id.as_deref() {
        None => None,
        Some(raw) => match oauth_svc::normalize_request_id(raw) {
            Some(id) => Some(id),
            None => return (StatusCode::BAD_REQUEST, "invalid request_id").into_response(),
        },
    };

    let oauth_state = OAuthState::for_request(request_id);
    let location = match oauth_svc::authorize_url(config, &oauth_state) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, %provider, "authorize url build failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "oauth provider misconfigured").into_response();
        }
    };

    let cookie = state_cookie(
        oauth_state.cookie_name(),
        oauth_state.encode(),
        state.config.cookie_secure,
        Duration::minutes(STATE_COOKIE_TTL_MINUTES),
    );
    tracing::info!(%provider, correlated = oauth_state.request_id().is_some(), "oauth connect started");
    (CookieJar::new().add(cookie), Redirect::temporary(&location)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteQuery {
    state: Option<String>,
    provider_id: Option<String>,
    display_name: Option<String>,
    /// Hex HMAC over `state|provider_id|display_name`.
    signature: Option<String>,
}

/// `GET /oauth/complete/{provider}/`: verify state, link the account, notify the opener.
pub async fn complete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(provider): Path<String>,
    Query(params): Query<CompleteQuery>,
) -> Response {
    let Some(config) = state.config.provider(&provider) else {
        return (StatusCode::NOT_FOUND, "unknown oauth provider").into_response();
    };

    // Verify OAuth CSRF state against its cookie.
    let Some(raw_state) = params.state.as_deref() else {
        return (StatusCode::BAD_REQUEST, "missing oauth state").into_response();
    };
    let Some(oauth_state) = OAuthState::decode(raw_state) else {
        return (StatusCode::BAD_REQUEST, "malformed oauth state").into_response();
    };
    let cookie_name = oauth_state.cookie_name();
    let expected = jar.get(&cookie_name).map(Cookie::value).unwrap_or_default();
    if expected.is_empty() || expected != raw_state {
        return (StatusCode::UNAUTHORIZED, "invalid oauth state").into_response();
    }

    let Some(provider_id) = params.provider_id.as_deref() else {
        return (StatusCode::BAD_REQUEST, "missing provider_id").into_response();
    };
    let display_name = params.display_name.as_deref().unwrap_or_default();
    let signature = params.signature.as_deref().unwrap_or_default();
    if !oauth_svc::verify_completion(&config.completion_secret, raw_state, provider_id, display_name, signature) {
        tracing::warn!(%provider, "unsigned or forged oauth completion rejected");
        return (StatusCode::UNAUTHORIZED, "invalid completion signature").into_response();
    }

    let account = match state.accounts.link(&provider, &config.label, provider_id, display_name).await {
        Ok(account) => account,
        Err(e) => {
            tracing::warn!(error = %e, %provider, "account link failed");
            return (crate::routes::accounts::account_error_to_status(&e), "invalid account identity").into_response();
        }
    };
    tracing::info!(account_id = %account.id, %provider, "account linked");

    let clear = state_cookie(cookie_name, String::new(), state.config.cookie_secure, Duration::ZERO);
    let page = oauth_svc::render_completion_page(&account.display_name, oauth_state.request_id());
    (jar.add(clear), Html(page)).into_response()
}

#[cfg(test)]
#[path = "oauth_test.rs"]
mod tests;
