use std::net::SocketAddr;
use std::path::PathBuf;

use medrecords_db_firestore::FirestoreConfig;
use medrecords_graphql::GraphQLConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// GraphQL schema and execution settings
    #[serde(default)]
    pub graphql: GraphQLConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        match self.storage.backend {
            StorageBackend::Memory => {}
            StorageBackend::Firestore => match &self.storage.firestore {
                Some(fs) => fs.validate()?,
                None => {
                    return Err(
                        "storage.backend = \"firestore\" requires a [storage.firestore] section"
                            .into(),
                    );
                }
            },
        }
        self.graphql.validate()?;
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        let ip = self
            .server
            .host
            .parse()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
        SocketAddr::new(ip, self.server.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    4000
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Which document store backs the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Firestore,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// JSON file mapping document paths to bodies, loaded into the memory
    /// backend at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    /// Default configuration file, relative to the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "medrecords.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., MEDRECORDS__SERVER__PORT=4001
        builder = builder.add_source(
            Environment::with_prefix("MEDRECORDS")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn load_config_with_default_path<P: AsRef<Path>>(
        path: Option<P>,
    ) -> Result<AppConfig, String> {
        let p = path
            .as_ref()
            .map(|p| p.as_ref().to_string_lossy().to_string());
        load_config(p.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrecords_graphql::IdStrategy;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:4000");
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.graphql.id_strategy, IdStrategy::Client);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_firestore_backend_requires_project() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Firestore;
        assert!(cfg.validate().is_err());

        cfg.storage.firestore = Some(FirestoreConfig::default());
        assert!(cfg.validate().is_err());

        cfg.storage.firestore = Some(FirestoreConfig::new("demo"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_deserialize_full_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 4100

            [storage]
            backend = "firestore"

            [storage.firestore]
            project_id = "clinic"
            endpoint = "http://localhost:8080"

            [graphql]
            id_strategy = "store"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 4100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.backend, StorageBackend::Firestore);
        assert_eq!(
            cfg.storage.firestore.as_ref().map(|f| f.project_id.as_str()),
            Some("clinic")
        );
        assert_eq!(cfg.graphql.id_strategy, IdStrategy::Store);
        assert!(cfg.validate().is_ok());
    }
}
