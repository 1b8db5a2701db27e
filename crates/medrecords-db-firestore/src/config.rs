//! Firestore backend configuration.
//!
//! Lives under `[storage.firestore]` in `medrecords.toml`:
//!
//! ```toml
//! [storage.firestore]
//! project_id = "my-project"
//! endpoint = "http://localhost:8080"   # Firestore emulator
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the Firestore REST API.
#[derive(Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project that owns the database.
    #[serde(default)]
    pub project_id: String,

    /// Database id. Default: `(default)`
    #[serde(default = "default_database")]
    pub database: String,

    /// API endpoint. Point this at the emulator for local development.
    /// Default: `https://firestore.googleapis.com`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// OAuth2 bearer token sent with every request. Obtaining it is the
    /// deployment's job; the emulator needs none.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Per-request timeout in milliseconds. Default: 10000
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Page size used when listing collections. Default: 300
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_database() -> String {
    "(default)".into()
}

fn default_endpoint() -> String {
    "https://firestore.googleapis.com".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_page_size() -> u32 {
    300
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: default_database(),
            endpoint: default_endpoint(),
            access_token: None,
            timeout_ms: default_timeout_ms(),
            page_size: default_page_size(),
        }
    }
}

impl fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl FirestoreConfig {
    /// Creates a config for `project_id` with defaults for everything else.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.project_id.trim().is_empty() {
            return Err("storage.firestore.project_id must be set".into());
        }
        if self.database.trim().is_empty() {
            return Err("storage.firestore.database must not be empty".into());
        }
        if url::Url::parse(&self.endpoint).is_err() {
            return Err(format!(
                "storage.firestore.endpoint is not a valid URL: {}",
                self.endpoint
            ));
        }
        if self.timeout_ms == 0 {
            return Err("storage.firestore.timeout_ms must be > 0".into());
        }
        if self.page_size == 0 {
            return Err("storage.firestore.page_size must be > 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FirestoreConfig::default();
        assert_eq!(config.database, "(default)");
        assert_eq!(config.endpoint, "https://firestore.googleapis.com");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config() {
        let config = FirestoreConfig::new("demo").with_endpoint("http://localhost:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = FirestoreConfig::new("demo").with_endpoint("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = FirestoreConfig::new("demo").with_access_token("secret-token");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            project_id = "demo"
            endpoint = "http://localhost:8080"
            page_size = 50
        "#;

        let config: FirestoreConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.project_id, "demo");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.database, "(default)");
        assert!(config.access_token.is_none());
    }
}
