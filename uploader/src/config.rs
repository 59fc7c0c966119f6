//! Collection configuration.
//!
//! Resolved once at startup from the environment (and `.env` if present),
//! then handed to [`crate::client::CollectionClient`]. Nothing here is
//! global or mutable after construction.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable holding the bearer credential.
pub const API_KEY_VAR: &str = "CIO_API_KEY";

/// Environment variable overriding the collection id.
pub const COLLECTION_ID_VAR: &str = "CIO_COLLECTION_ID";

/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "CIO_API_URL";

/// Environment variable setting a request timeout in seconds.
pub const TIMEOUT_VAR: &str = "CIO_TIMEOUT_SECS";

/// Collection holding the CD rate records.
pub const DEFAULT_COLLECTION_ID: u64 = 5;

/// Base URL of the collections API.
pub const DEFAULT_API_URL: &str = "https://api.customer.io/v1/api";

/// Where and how to write the collection content.
#[derive(Clone)]
pub struct CollectionConfig {
    api_key: String,
    pub collection_id: u64,
    pub api_url: String,
    pub timeout: Option<Duration>,
}

impl CollectionConfig {
    /// Create a config for the default collection.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            collection_id: DEFAULT_COLLECTION_ID,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }

    /// Resolve the config from environment variables (a `.env` file is honored).
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve the config from any variable source.
    ///
    /// The key must be present and non-blank; the other variables fall
    /// back to their defaults when unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_VAR.to_string()))?;

        let mut config = Self::new(api_key);

        if let Some(raw) = lookup(COLLECTION_ID_VAR) {
            config.collection_id = parse_collection_id(&raw)?;
        }
        if let Some(url) = lookup(API_URL_VAR) {
            config = config.with_api_url(&url);
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Target a different collection.
    pub fn with_collection_id(mut self, collection_id: u64) -> Self {
        self.collection_id = collection_id;
        self
    }

    /// Target a different API host (trailing slashes are dropped).
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Set an explicit request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of the collection content endpoint.
    pub fn content_url(&self) -> String {
        format!(
            "{}/collections/{}/content",
            self.api_url, self.collection_id
        )
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for CollectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("api_key", &"<redacted>")
            .field("collection_id", &self.collection_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Parse a collection id given on the command line or in the environment.
pub fn parse_collection_id(raw: &str) -> ConfigResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidCollectionId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_lookup_defaults() {
        let config = CollectionConfig::from_lookup(vars(&[("CIO_API_KEY", "token")])).unwrap();
        assert_eq!(config.api_key(), "token");
        assert_eq!(config.collection_id, DEFAULT_COLLECTION_ID);
        assert_eq!(config.collection_id, 5);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_lookup_missing_key() {
        let err = CollectionConfig::from_lookup(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(ref v) if v == "CIO_API_KEY"));
    }

    #[test]
    fn test_lookup_blank_key() {
        let err = CollectionConfig::from_lookup(vars(&[("CIO_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = CollectionConfig::from_lookup(vars(&[
            ("CIO_API_KEY", "token"),
            ("CIO_COLLECTION_ID", "12"),
            ("CIO_API_URL", "http://localhost:9000/"),
            ("CIO_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(
            config.content_url(),
            "http://localhost:9000/collections/12/content"
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_lookup_invalid_collection_id() {
        let err = CollectionConfig::from_lookup(vars(&[
            ("CIO_API_KEY", "token"),
            ("CIO_COLLECTION_ID", "rates"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCollectionId(ref v) if v == "rates"));
    }

    #[test]
    fn test_lookup_invalid_timeout() {
        let err = CollectionConfig::from_lookup(vars(&[
            ("CIO_API_KEY", "token"),
            ("CIO_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(ref v) if v == "soon"));
    }

    #[test]
    fn test_default_content_url() {
        let config = CollectionConfig::new("secret");
        assert_eq!(
            config.content_url(),
            "https://api.customer.io/v1/api/collections/5/content"
        );
    }

    #[test]
    fn test_overrides() {
        let config = CollectionConfig::new("secret")
            .with_collection_id(42)
            .with_api_url("http://127.0.0.1:8080/");
        assert_eq!(
            config.content_url(),
            "http://127.0.0.1:8080/collections/42/content"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = CollectionConfig::new("super-secret-token");
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("super-secret-token"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn test_parse_collection_id() {
        assert_eq!(parse_collection_id(" 7 ").unwrap(), 7);
        assert!(matches!(
            parse_collection_id("seven"),
            Err(ConfigError::InvalidCollectionId(_))
        ));
    }
}
