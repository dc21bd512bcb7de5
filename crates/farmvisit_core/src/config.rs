//! Submission endpoint configuration.
//!
//! # Invariants
//! - The base URL is absolute and uses http or https.
//! - The endpoint is `<base>/survey` whether or not the base ends in `/`.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable holding the API base URL.
pub const ENV_API_BASE_URL: &str = "SURVEY_API_BASE_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_API_TIMEOUT_SECS: &str = "SURVEY_API_TIMEOUT_SECS";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SURVEY_ENDPOINT_PATH: &str = "survey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
}

impl SubmitConfig {
    /// Builds a config from a raw base URL and the default timeout.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Reads `SURVEY_API_BASE_URL` and `SURVEY_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup (environment, `.env`, tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(ENV_API_BASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_API_BASE_URL))?;
        let mut config = Self::new(&raw_url)?;

        if let Some(raw_timeout) = lookup(ENV_API_TIMEOUT_SECS) {
            let trimmed = raw_timeout.trim();
            if !trimmed.is_empty() {
                let seconds = trimmed
                    .parse::<u64>()
                    .ok()
                    .filter(|value| *value > 0)
                    .ok_or_else(|| ConfigError::InvalidTimeout(raw_timeout.clone()))?;
                config.request_timeout = Duration::from_secs(seconds);
            }
        }
        Ok(config)
    }

    /// Full submission endpoint.
    pub fn endpoint(&self) -> Url {
        let mut base = self.api_base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        // Joining a relative segment onto an absolute http(s) URL cannot fail.
        base.join(SURVEY_ENDPOINT_PATH).unwrap_or(base)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        value: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            value: trimmed.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidUrl { value: String, reason: String },
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing configuration value `{key}`"),
            Self::InvalidUrl { value, reason } => {
                write!(f, "invalid API base URL `{value}`: {reason}")
            }
            Self::InvalidTimeout(value) => {
                write!(f, "invalid request timeout `{value}`; expected whole seconds > 0")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SubmitConfig, ENV_API_BASE_URL, ENV_API_TIMEOUT_SECS};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let with = SubmitConfig::new("https://api.example.org/v1/").unwrap();
        let without = SubmitConfig::new("https://api.example.org/v1").unwrap();
        assert_eq!(with.endpoint().as_str(), "https://api.example.org/v1/survey");
        assert_eq!(without.endpoint(), with.endpoint());
    }

    #[test]
    fn missing_base_url_is_reported() {
        let err = SubmitConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_API_BASE_URL));
    }

    #[test]
    fn rejects_non_http_schemes() {
        let err = SubmitConfig::new("ftp://files.example.org").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn timeout_is_read_from_lookup() {
        let config = SubmitConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "http://localhost:8000"),
            (ENV_API_TIMEOUT_SECS, "12"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(12));

        let err = SubmitConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "http://localhost:8000"),
            (ENV_API_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("0".to_string()));
    }
}
