//! Account claim page route.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;

use crate::services::claim::{ClaimFormContext, render_claim_page};

#[derive(Debug, Default, Deserialize)]
pub struct ClaimQuery {
    firstname: Option<String>,
    fullname: Option<String>,
    email: Option<String>,
    token: Option<String>,
    next: Option<String>,
}

/// `GET /account/claim/`: render the set-password form for a claim link.
pub async fn claim_page(Query(params): Query<ClaimQuery>) -> Result<Html<String>, StatusCode> {
    let email = params.email.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let token = params.token.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let (Some(email), Some(token)) = (email, token) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let firstname = params.firstname.as_deref().unwrap_or_default();
    let fullname = params.fullname.as_deref().filter(|v| !v.trim().is_empty()).unwrap_or(firstname);
    let ctx = ClaimFormContext::new(firstname, fullname, email, token, params.next.as_deref());
    Ok(Html(render_claim_page(&ctx)))
}

#[cfg(test)]
#[path = "claim_test.rs"]
mod tests;
