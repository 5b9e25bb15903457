// Client configuration.
//
// The API key, base URL and listing page size are gathered once into a
// `Config` value which is handed to `MochiClient::new`. Nothing in the
// client reads the process environment after that point.

use anyhow::{Context, Result};
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://app.mochi.cards/api/";

/// Mochi hands out 10 items per page unless asked for more; 100 is the
/// most it accepts.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

pub const API_KEY_VAR: &str = "MOCHI_API_KEY";
pub const BASE_URL_VAR: &str = "MOCHI_API_BASE_URL";
pub const PAGE_LIMIT_VAR: &str = "MOCHI_PAGE_LIMIT";

/// File in the home directory consulted when `MOCHI_API_KEY` is unset.
pub const CREDENTIAL_FILE: &str = ".mochi_api_key";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Sent as the Basic-Auth username; the password is always empty.
    pub api_key: String,
    /// Always ends with `/` so endpoint paths can be appended directly.
    pub base_url: String,
    /// `limit` query parameter for listings. `None` leaves the service default.
    pub page_limit: Option<u32>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: Some(DEFAULT_PAGE_LIMIT),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    pub fn with_page_limit(mut self, page_limit: Option<u32>) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Build a configuration from the environment.
    ///
    /// A `.env` file in the working directory is loaded first. The key comes
    /// from `MOCHI_API_KEY`, falling back to `~/.mochi_api_key`. A missing
    /// key is not an error here: the service rejects the first request with
    /// a 401 instead.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let credential = credential_path().and_then(|p| std::fs::read_to_string(p).ok());
        Self::from_lookup(|name| std::env::var(name).ok(), credential)
    }

    pub(crate) fn from_lookup<F>(lookup: F, credential_file: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup(API_KEY_VAR).filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => match credential_file.map(|c| c.trim().to_string()) {
                Some(key) if !key.is_empty() => {
                    debug!("using API key from {}", CREDENTIAL_FILE);
                    key
                }
                _ => {
                    warn!(
                        "{} is not set; requests will be rejected by the service",
                        API_KEY_VAR
                    );
                    String::new()
                }
            },
        };

        let mut config = Config::new(api_key);
        if let Some(url) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(url);
        }
        if let Some(raw) = lookup(PAGE_LIMIT_VAR) {
            let limit: NonZeroU32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer, got {:?}", PAGE_LIMIT_VAR, raw))?;
            config = config.with_page_limit(Some(limit.get()));
        }
        Ok(config)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn credential_path() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(CREDENTIAL_FILE))
}

fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_limit, Some(100));
        assert!(config.has_api_key());
    }

    #[test]
    fn env_key_wins_over_credential_file() {
        let config =
            Config::from_lookup(lookup_from(&[(API_KEY_VAR, "from-env")]), Some("from-file".into()))
                .unwrap();
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn credential_file_is_trimmed() {
        let config = Config::from_lookup(lookup_from(&[]), Some("  from-file\n".into())).unwrap();
        assert_eq!(config.api_key, "from-file");
    }

    #[test]
    fn missing_key_is_empty_not_an_error() {
        let config = Config::from_lookup(lookup_from(&[]), None).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = Config::from_lookup(
            lookup_from(&[(BASE_URL_VAR, "http://localhost:9000/api")]),
            None,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/api/");
    }

    #[test]
    fn page_limit_override() {
        let config = Config::from_lookup(lookup_from(&[(PAGE_LIMIT_VAR, "25")]), None).unwrap();
        assert_eq!(config.page_limit, Some(25));
    }

    #[test]
    fn bad_page_limit_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(PAGE_LIMIT_VAR, "lots")]), None).unwrap_err();
        assert!(err.to_string().contains(PAGE_LIMIT_VAR));
    }

    #[test]
    fn zero_page_limit_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(PAGE_LIMIT_VAR, "0")]), None).unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }
}
