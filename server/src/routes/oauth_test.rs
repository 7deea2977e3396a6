use super::*;
use crate::state::test_helpers;
use axum::http::header::{LOCATION, SET_COOKIE};

async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect()
}

fn connect_query(request_id: Option<&str>) -> Query<ConnectQuery> {
    Query(ConnectQuery { request_id: request_id.map(str::to_owned) })
}

fn complete_query(state: Option<&str>, provider_id: Option<&str>, display_name: Option<&str>) -> Query<CompleteQuery> {
    Query(CompleteQuery {
        state: state.map(str::to_owned),
        provider_id: provider_id.map(str::to_owned),
        display_name: display_name.map(str::to_owned),
        signature: None,
    })
}

/// A completion query signed the way the token-exchange service signs it.
fn signed_query(state: &str, provider_id: &str, display_name: &str) -> Query<CompleteQuery> {
    let signature =
        oauth_svc::sign_completion(test_helpers::TEST_COMPLETION_SECRET, state, provider_id, display_name).unwrap();
    let Query(mut params) = complete_query(Some(state), Some(provider_id), Some(display_name));
    params.signature = Some(signature);
    Query(params)
}

fn jar_with(name: &str, value: &str) -> CookieJar {
    CookieJar::new().add(Cookie::new(name.to_owned(), value.to_owned()))
}

// =============================================================================
// connect
// =============================================================================

#[tokio::test]
async fn connect_redirects_with_correlated_state_and_cookie() {
    let state = test_helpers::test_app_state();

    let resp = connect(State(state), Path("zotero".to_owned()), connect_query(Some("abc-1"))).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = resp.headers().get(LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with("https://www.zotero.org/oauth/authorize?"));
    assert!(location.contains("client_id=client-123"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("state=req.abc-1"));

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("oauth_state_abc-1=req.abc-1"));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("Max-Age=600"));
}

#[tokio::test]
async fn connect_without_request_id_uses_anonymous_state() {
    let state = test_helpers::test_app_state();

    let resp = connect(State(state), Path("zotero".to_owned()), connect_query(None)).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = resp.headers().get(LOCATION).unwrap().to_str().unwrap();
    assert!(location.contains("state=anon."));
    assert!(set_cookies(&resp)[0].starts_with("oauth_state_"));
}

#[tokio::test]
async fn connect_unknown_provider_is_not_found() {
    let state = test_helpers::test_app_state();
    let resp = connect(State(state), Path("mendeley".to_owned()), connect_query(None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn connect_rejects_malformed_request_id() {
    let state = test_helpers::test_app_state();
    let resp = connect(State(state), Path("zotero".to_owned()), connect_query(Some("<x>"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// complete
// =============================================================================

#[tokio::test]
async fn complete_links_account_and_posts_correlated_message() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_abc-1", "req.abc-1");

    let resp = complete(
        State(state.clone()),
        jar,
        Path("zotero".to_owned()),
        signed_query("req.abc-1", "1001", "Ada"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("oauth_state_abc-1=") && c.contains("Max-Age=0")));

    let html = body_text(resp).await;
    assert!(html.contains(r#"\"request_id\":\"abc-1\""#));

    let linked = state.accounts.list_for_provider("zotero").await;
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].display_name, "Ada");
    assert_eq!(linked[0].provider_id, "1001");
    assert_eq!(linked[0].provider_name, "Zotero");
}

#[tokio::test]
async fn complete_anonymous_state_calls_legacy_hook() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_ff00", "anon.ff00");

    let resp = complete(
        State(state),
        jar,
        Path("zotero".to_owned()),
        signed_query("anon.ff00", "1001", ""),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("var message = null;"));
    assert!(html.contains("Connected 1001."));
}

#[tokio::test]
async fn complete_relinking_updates_existing_account() {
    let state = test_helpers::test_app_state();
    let existing = state.accounts.link("zotero", "Zotero", "1001", "Old").await.unwrap();
    let jar = jar_with("oauth_state_abc-1", "req.abc-1");

    let resp = complete(
        State(state.clone()),
        jar,
        Path("zotero".to_owned()),
        signed_query("req.abc-1", "1001", "New"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let linked = state.accounts.list_for_provider("zotero").await;
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, existing.id);
    assert_eq!(linked[0].display_name, "New");
}

#[tokio::test]
async fn complete_state_mismatch_is_unauthorized() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_abc-1", "req.other");

    let resp = complete(
        State(state.clone()),
        jar,
        Path("zotero".to_owned()),
        signed_query("req.abc-1", "1001", "Ada"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.accounts.list_for_provider("zotero").await.is_empty());
}

#[tokio::test]
async fn complete_missing_cookie_is_unauthorized() {
    let state = test_helpers::test_app_state();
    let resp = complete(
        State(state),
        CookieJar::new(),
        Path("zotero".to_owned()),
        complete_query(Some("req.abc-1"), Some("1001"), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn complete_missing_or_malformed_state_is_bad_request() {
    let state = test_helpers::test_app_state();
    let missing = complete(
        State(state.clone()),
        CookieJar::new(),
        Path("zotero".to_owned()),
        complete_query(None, Some("1001"), None),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let malformed = complete(
        State(state),
        CookieJar::new(),
        Path("zotero".to_owned()),
        complete_query(Some("bogus"), Some("1001"), None),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn complete_missing_provider_id_is_bad_request() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_abc-1", "req.abc-1");
    let resp = complete(State(state), jar, Path("zotero".to_owned()), complete_query(Some("req.abc-1"), None, None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn complete_unknown_provider_is_not_found() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_abc-1", "req.abc-1");
    let resp = complete(
        State(state),
        jar,
        Path("mendeley".to_owned()),
        complete_query(Some("req.abc-1"), Some("1001"), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complete_unsigned_identity_is_unauthorized() {
    let state = test_helpers::test_app_state();
    let started = connect(State(state.clone()), Path("zotero".to_owned()), connect_query(Some("forge-1"))).await;
    let cookie = Cookie::parse(set_cookies(&started)[0].clone()).unwrap();
    let jar = CookieJar::new().add(cookie);

    let resp = complete(
        State(state.clone()),
        jar,
        Path("zotero".to_owned()),
        complete_query(Some("req.forge-1"), Some("someone-elses-zotero-id"), Some("Victim")),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.accounts.list_for_provider("zotero").await.is_empty());
}

#[tokio::test]
async fn complete_signature_for_other_identity_is_unauthorized() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_abc-1", "req.abc-1");
    let Query(mut params) = signed_query("req.abc-1", "1001", "Ada");
    params.provider_id = Some("2002".to_owned());

    let resp = complete(State(state.clone()), jar, Path("zotero".to_owned()), Query(params)).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.accounts.list_for_provider("zotero").await.is_empty());
}

#[tokio::test]
async fn complete_signature_from_wrong_secret_is_unauthorized() {
    let state = test_helpers::test_app_state();
    let jar = jar_with("oauth_state_abc-1", "req.abc-1");
    let Query(mut params) = complete_query(Some("req.abc-1"), Some("1001"), Some("Ada"));
    params.signature = oauth_svc::sign_completion("not-the-secret", "req.abc-1", "1001", "Ada");

    let resp = complete(State(state.clone()), jar, Path("zotero".to_owned()), Query(params)).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.accounts.list_for_provider("zotero").await.is_empty());
}
