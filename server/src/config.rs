//! Server configuration parsed from environment variables.
//!
//! Providers are opt-in: `OAUTH_PROVIDERS=zotero` enables one provider whose
//! settings are read from `OAUTH_ZOTERO_*`. A provider that is listed but
//! incompletely configured is a startup error rather than a silent 404.

use url::Url;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A value was present but could not be parsed.
    #[error("invalid {key}: {value:?}")]
    Invalid { key: String, value: String },

    /// A listed provider is missing one of its required variables.
    #[error("provider {provider} requires {key}")]
    MissingProviderVar { provider: String, key: String },

    /// Provider names are lowercase slugs used in URL paths.
    #[error("invalid provider name {0:?} (expected lowercase letters, digits, '-' or '_')")]
    InvalidProviderName(String),
}

/// OAuth client settings for one external provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Slug used in `/oauth/connect/{provider}/` and the settings API.
    pub name: String,
    /// Human-readable provider name recorded on linked accounts.
    pub label: String,
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: Option<String>,
    /// Shared with the token-exchange service; signs completion redirects.
    pub completion_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub providers: Vec<ProviderConfig>,
    /// Mark cookies `Secure`.
    pub cookie_secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, providers: Vec::new(), cookie_secure: false }
    }
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `OAUTH_PROVIDERS`: comma-separated provider slugs, default none
    /// - `COOKIE_SECURE`: `1/true/yes/on` or `0/false/no/off`; inferred from
    ///   an `https://` redirect URI when absent
    ///
    /// Required per listed provider `<P>` (uppercased, `-` as `_`):
    /// - `OAUTH_<P>_AUTHORIZE_URL`, `OAUTH_<P>_CLIENT_ID`, `OAUTH_<P>_REDIRECT_URI`
    /// - `OAUTH_<P>_COMPLETION_SECRET`
    ///
    /// Optional per provider: `OAUTH_<P>_SCOPE`, `OAUTH_<P>_LABEL` (defaults
    /// to the slug).
    ///
    /// # Errors
    ///
    /// Returns an error if any present value fails to parse or a listed
    /// provider is incomplete.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT".into(), value: raw.clone() })?,
            None => DEFAULT_PORT,
        };

        let mut providers = Vec::new();
        for name in parse_provider_list(lookup("OAUTH_PROVIDERS").as_deref())? {
            providers.push(provider_from_lookup(&name, &lookup)?);
        }

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => {
                parse_bool(&raw).ok_or_else(|| ConfigError::Invalid { key: "COOKIE_SECURE".into(), value: raw.clone() })?
            }
            None => providers.iter().any(|p| p.redirect_uri.starts_with("https://")),
        };

        Ok(Self { port, providers, cookie_secure })
    }

    /// Look up a configured provider by slug.
    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_provider_list(raw: Option<&str>) -> Result<Vec<String>, ConfigError> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.unwrap_or_default().split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !is_provider_slug(name) {
            return Err(ConfigError::InvalidProviderName(name.to_owned()));
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    Ok(names)
}

fn is_provider_slug(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn provider_env_key(provider: &str, suffix: &str) -> String {
    format!("OAUTH_{}_{suffix}", provider.to_ascii_uppercase().replace('-', "_"))
}

fn provider_from_lookup<F>(name: &str, lookup: &F) -> Result<ProviderConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |suffix: &str| {
        let key = provider_env_key(name, suffix);
        lookup(&key)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingProviderVar { provider: name.to_owned(), key })
    };

    let authorize_url = required("AUTHORIZE_URL")?;
    if Url::parse(&authorize_url).is_err() {
        return Err(ConfigError::Invalid { key: provider_env_key(name, "AUTHORIZE_URL"), value: authorize_url });
    }
    let client_id = required("CLIENT_ID")?;
    let redirect_uri = required("REDIRECT_URI")?;
    let completion_secret = required("COMPLETION_SECRET")?;
    let optional = |suffix: &str| {
        lookup(&provider_env_key(name, suffix))
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };
    let scope = optional("SCOPE");
    let label = optional("LABEL").unwrap_or_else(|| name.to_owned());

    Ok(ProviderConfig {
        name: name.to_owned(),
        label,
        authorize_url,
        client_id,
        redirect_uri,
        scope,
        completion_secret,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
