use super::*;

fn context(next_url: Option<&str>) -> ClaimFormContext {
    ClaimFormContext::new("Ada", "Ada Lovelace", "ada@example.org", "tok-123", next_url)
}

// =============================================================================
// escape_html / fill_template
// =============================================================================

#[test]
fn escape_html_covers_markup_characters() {
    assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn fill_template_replaces_known_keys() {
    assert_eq!(fill_template("Hi {{NAME}}, {{NAME}}!", &[("NAME", "Ada")]), "Hi Ada, Ada!");
}

#[test]
fn fill_template_does_not_rescan_values() {
    let out = fill_template("{{A}} {{B}}", &[("A", "{{B}}"), ("B", "b")]);
    assert_eq!(out, "{{B}} b");
}

#[test]
fn fill_template_keeps_unknown_and_unterminated_placeholders() {
    assert_eq!(fill_template("{{X}} {{Y", &[("Z", "z")]), "{{X}} {{Y");
}

// =============================================================================
// render_claim_page
// =============================================================================

#[test]
fn username_is_prefilled_with_email() {
    let html = render_claim_page(&context(None));
    assert!(html.contains(r#"name="username" value="ada@example.org""#));
}

#[test]
fn password_fields_are_empty() {
    let html = render_claim_page(&context(None));
    assert!(html.contains(r#"type="password" name="password" value="""#));
    assert!(html.contains(r#"type="password" name="password2" value="""#));
}

#[test]
fn token_is_hidden_field() {
    let html = render_claim_page(&context(None));
    assert!(html.contains(r#"<input type="hidden" name="token" value="tok-123">"#));
}

#[test]
fn form_posts_to_same_origin() {
    let html = render_claim_page(&context(None));
    assert!(html.contains(r#"method="POST" action="""#));
}

#[test]
fn next_url_field_only_with_target() {
    let without = render_claim_page(&context(None));
    assert!(!without.contains("next_url"));

    let with = render_claim_page(&context(Some("/project/abc/")));
    assert!(with.contains(r#"<input type="hidden" name="next_url" value="/project/abc/">"#));
}

#[test]
fn blank_next_url_is_treated_as_absent() {
    let ctx = context(Some("   "));
    assert_eq!(ctx.next_url, None);
    assert!(!render_claim_page(&ctx).contains("next_url"));
}

#[test]
fn greeting_uses_first_name_and_title_uses_full_name() {
    let html = render_claim_page(&context(None));
    assert!(html.contains("Hello Ada!"));
    assert!(html.contains("Claim account for Ada Lovelace"));
}

#[test]
fn interpolated_values_are_escaped() {
    let ctx = ClaimFormContext::new(
        "<script>",
        "A & B",
        "x\"@example.org",
        "t'k",
        Some("/next?a=1&b=\"2\""),
    );
    let html = render_claim_page(&ctx);
    assert!(!html.contains("<script>"));
    assert!(html.contains("Hello &lt;script&gt;!"));
    assert!(html.contains("A &amp; B"));
    assert!(html.contains(r#"value="x&quot;@example.org""#));
    assert!(html.contains(r#"value="t&#x27;k""#));
    assert!(html.contains(r#"value="/next?a=1&amp;b=&quot;2&quot;""#));
}

#[test]
fn placeholder_in_user_value_is_not_expanded() {
    let ctx = ClaimFormContext::new("{{TOKEN}}", "Full", "a@b.c", "secret", None);
    let html = render_claim_page(&ctx);
    assert!(html.contains("Hello {{TOKEN}}!"));
}
