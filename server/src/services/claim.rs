//! Account claim page rendering.
//!
//! A claim link lands an unregistered contributor on a form that sets their
//! first password. Rendering is a pure function of [`ClaimFormContext`];
//! submission and validation belong to the form-processing endpoint.

const CLAIM_TEMPLATE: &str = include_str!("../../templates/claim_account.html");

/// One visible input of the claim form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
}

/// Field set submitted by the claim form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimForm {
    pub username: FormField,
    pub password: FormField,
    pub password2: FormField,
    /// Name of the hidden token input.
    pub token: &'static str,
}

impl ClaimForm {
    /// Form for `email`: username pre-filled, passwords empty.
    #[must_use]
    pub fn for_email(email: &str) -> Self {
        Self {
            username: FormField { name: "username", label: "Email", input_type: "email", value: email.to_owned() },
            password: FormField { name: "password", label: "Password", input_type: "password", value: String::new() },
            password2: FormField {
                name: "password2",
                label: "Verify password",
                input_type: "password",
                value: String::new(),
            },
            token: "token",
        }
    }

    fn visible_fields(&self) -> [&FormField; 3] {
        [&self.username, &self.password, &self.password2]
    }
}

/// Render input for the claim page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimFormContext {
    pub firstname: String,
    pub fullname: String,
    pub email: String,
    pub token: String,
    /// Where to send the user after a successful claim.
    pub next_url: Option<String>,
    pub form: ClaimForm,
}

impl ClaimFormContext {
    #[must_use]
    pub fn new(firstname: &str, fullname: &str, email: &str, token: &str, next_url: Option<&str>) -> Self {
        Self {
            firstname: firstname.to_owned(),
            fullname: fullname.to_owned(),
            email: email.to_owned(),
            token: token.to_owned(),
            next_url: next_url.filter(|url| !url.trim().is_empty()).map(str::to_owned),
            form: ClaimForm::for_email(email),
        }
    }
}

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace `{{KEY}}` placeholders in one pass.
///
/// Substituted values are never rescanned, so a value containing `{{...}}`
/// stays literal. Unknown placeholders are left as is.
#[must_use]
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn render_field(field: &FormField) -> String {
    let id = format!("id_{}", field.name);
    format!(
        "      <div class=\"claim-account__field\">\n        <label for=\"{id}\">{label}</label>\n        \
         <input id=\"{id}\" type=\"{kind}\" name=\"{name}\" value=\"{value}\" required>\n      </div>",
        label = escape_html(field.label),
        kind = field.input_type,
        name = field.name,
        value = escape_html(&field.value),
    )
}

/// Render the claim page for `ctx`.
///
/// The hidden `next_url` input is emitted only when a redirect target is set.
#[must_use]
pub fn render_claim_page(ctx: &ClaimFormContext) -> String {
    let fields = ctx
        .form
        .visible_fields()
        .into_iter()
        .map(render_field)
        .collect::<Vec<_>>()
        .join("\n");
    let next_url_field = ctx
        .next_url
        .as_deref()
        .map(|url| format!("      <input type=\"hidden\" name=\"next_url\" value=\"{}\">", escape_html(url)))
        .unwrap_or_default();
    let firstname = escape_html(&ctx.firstname);
    let fullname = escape_html(&ctx.fullname);
    let token = escape_html(&ctx.token);

    fill_template(
        CLAIM_TEMPLATE,
        &[
            ("FIRSTNAME", &firstname),
            ("FULLNAME", &fullname),
            ("FIELDS", &fields),
            ("TOKEN_NAME", ctx.form.token),
            ("TOKEN", &token),
            ("NEXT_URL_FIELD", &next_url_field),
        ],
    )
}

#[cfg(test)]
#[path = "claim_test.rs"]
mod tests;
