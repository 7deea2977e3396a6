use super::*;

// =============================================================
// AccountsResponse
// =============================================================

#[test]
fn accounts_response_keeps_server_order() {
    let raw = r#"{"accounts":[{"display_name":"A","id":"1"},{"display_name":"B","id":"2"}]}"#;
    let body: AccountsResponse = serde_json::from_str(raw).unwrap();
    let ids: Vec<&str> = body.accounts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(body.accounts[0].display_name, "A");
}

#[test]
fn accounts_response_missing_list_is_empty() {
    let body: AccountsResponse = serde_json::from_str("{}").unwrap();
    assert!(body.accounts.is_empty());
}

#[test]
fn accounts_response_tolerates_duplicate_ids() {
    let raw = r#"{"accounts":[{"display_name":"A","id":"1"},{"display_name":"A again","id":"1"}]}"#;
    let body: AccountsResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(body.accounts.len(), 2);
}

#[test]
fn linked_account_rejects_missing_id() {
    let result = serde_json::from_str::<LinkedAccount>(r#"{"display_name":"A"}"#);
    assert!(result.is_err());
}

// =============================================================
// OAuthCompleteMessage
// =============================================================

#[test]
fn complete_message_serializes_type_tag() {
    let json = serde_json::to_value(OAuthCompleteMessage::correlated("req-1")).unwrap();
    assert_eq!(json, serde_json::json!({"type": "oauth_complete", "request_id": "req-1"}));
}

#[test]
fn complete_message_without_request_id() {
    let msg: OAuthCompleteMessage = serde_json::from_str(r#"{"type":"oauth_complete"}"#).unwrap();
    assert_eq!(msg.kind, OAUTH_COMPLETE_MESSAGE_TYPE);
    assert!(msg.request_id.is_none());
    let json = serde_json::to_string(&msg).unwrap();
    assert!(!json.contains("request_id"));
}
