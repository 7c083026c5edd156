use std::time::Duration;

use crate::prelude::*;

pub mod confluence;

/// Confluence configuration from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfluenceConfig {
    /// Base URL the REST paths are appended to (e.g. `https://acme.atlassian.net/wiki`).
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    /// Pause taken by the MCP server before each Confluence tool call.
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl ConfluenceConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Load configuration from environment variables
    ///
    /// Uses CONFLUENCE_BASE_URL if set, otherwise ATLASSIAN_BASE_URL with `/wiki` appended.
    /// Uses CONFLUENCE_API_TOKEN if set, otherwise ATLASSIAN_API_TOKEN.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = match var("CONFLUENCE_BASE_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => var("ATLASSIAN_BASE_URL")
                .map(|url| format!("{}/wiki", url.trim_end_matches('/')))
                .ok_or_else(|| {
                    Error::MissingEnvPair(
                        "CONFLUENCE_BASE_URL".to_string(),
                        "ATLASSIAN_BASE_URL".to_string(),
                    )
                })?,
        };

        let email =
            var("ATLASSIAN_EMAIL").ok_or_else(|| Error::MissingEnv("ATLASSIAN_EMAIL".to_string()))?;

        let api_token = var("CONFLUENCE_API_TOKEN")
            .or_else(|| var("ATLASSIAN_API_TOKEN"))
            .ok_or_else(|| {
                Error::MissingEnvPair(
                    "CONFLUENCE_API_TOKEN".to_string(),
                    "ATLASSIAN_API_TOKEN".to_string(),
                )
            })?;

        let request_delay = parse_u64(
            var("CONFLUENCE_REQUEST_DELAY_MS"),
            "CONFLUENCE_REQUEST_DELAY_MS",
            0,
        )?;
        let timeout = parse_u64(
            var("CONFLUENCE_TIMEOUT_SECS"),
            "CONFLUENCE_TIMEOUT_SECS",
            Self::DEFAULT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            base_url,
            email,
            api_token,
            request_delay: Duration::from_millis(request_delay),
            timeout: Duration::from_secs(timeout),
        })
    }
}

fn parse_u64(value: Option<String>, name: &str, default: u64) -> Result<u64, Error> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidEnv {
            name: name.to_string(),
            value: raw,
        }),
    }
}

/// Create an authenticated HTTP client with Basic Auth headers
pub fn create_confluence_client(config: &ConfluenceConfig) -> Result<reqwest::Client> {
    use base64::Engine;
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

    let auth_string = format!("{}:{}", config.email, config.api_token);
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    // No default Content-Type: JSON and multipart requests each set their own.
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {auth_encoded}"))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_atlassian_fallbacks() {
        let config = ConfluenceConfig::from_lookup(lookup(&[
            ("ATLASSIAN_BASE_URL", "https://acme.atlassian.net/"),
            ("ATLASSIAN_EMAIL", "me@acme.com"),
            ("ATLASSIAN_API_TOKEN", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://acme.atlassian.net/wiki");
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_confluence_variables_take_precedence() {
        let config = ConfluenceConfig::from_lookup(lookup(&[
            ("CONFLUENCE_BASE_URL", "https://wiki.internal/confluence/"),
            ("ATLASSIAN_BASE_URL", "https://acme.atlassian.net"),
            ("ATLASSIAN_EMAIL", "me@acme.com"),
            ("CONFLUENCE_API_TOKEN", "wiki-token"),
            ("ATLASSIAN_API_TOKEN", "secret"),
            ("CONFLUENCE_REQUEST_DELAY_MS", "250"),
            ("CONFLUENCE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://wiki.internal/confluence");
        assert_eq!(config.api_token, "wiki-token");
        assert_eq!(config.request_delay, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_email() {
        let error = ConfluenceConfig::from_lookup(lookup(&[
            ("CONFLUENCE_BASE_URL", "https://wiki.internal"),
            ("CONFLUENCE_API_TOKEN", "t"),
        ]))
        .unwrap_err();

        assert_eq!(error, Error::MissingEnv("ATLASSIAN_EMAIL".to_string()));
    }

    #[test]
    fn test_invalid_delay() {
        let error = ConfluenceConfig::from_lookup(lookup(&[
            ("CONFLUENCE_BASE_URL", "https://wiki.internal"),
            ("ATLASSIAN_EMAIL", "me@acme.com"),
            ("CONFLUENCE_API_TOKEN", "t"),
            ("CONFLUENCE_REQUEST_DELAY_MS", "soon"),
        ]))
        .unwrap_err();

        assert_eq!(
            error,
            Error::InvalidEnv {
                name: "CONFLUENCE_REQUEST_DELAY_MS".to_string(),
                value: "soon".to_string()
            }
        );
    }
}
