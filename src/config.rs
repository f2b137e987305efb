//! Application configuration.
//!
//! Values are resolved with priority: config.toml > .env / environment > default.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

/// How often the maintenance task checks for a date change
pub const MAINTENANCE_CHECK_SECS: u64 = 60;

// ==================== Storage Configuration ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn default_path(&self) -> PathBuf {
        match self {
            Self::Sqlite => PathBuf::from(paths::sqlite_db_path()),
            Self::Json => PathBuf::from(paths::json_storage_path()),
        }
    }
}

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    storage: Option<StorageSection>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    port: Option<u16>,
    maintenance_check_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    backend: Option<String>,
    path: Option<String>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database_path: PathBuf,
    pub maintenance_interval: Duration,
    pub audio_dir: PathBuf,
}

impl AppConfig {
    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", SERVER_ADDR, self.port)
    }
}

/// Load configuration from config.toml, .env and the environment.
pub fn load_config() -> AppConfig {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let file = match std::fs::read_to_string("config.toml") {
        Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
            Ok(config) => {
                tracing::info!("Using config.toml");
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid config.toml: {}", e);
                FileConfig::default()
            }
        },
        Err(_) => FileConfig::default(),
    };

    resolve(file, |key| std::env::var(key).ok())
}

fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> AppConfig {
    let server = file.server;
    let storage = file.storage;

    let port = server
        .as_ref()
        .and_then(|s| s.port)
        .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
        .unwrap_or(SERVER_PORT);

    let storage_backend = storage
        .as_ref()
        .and_then(|s| s.backend.as_deref())
        .and_then(StorageBackend::from_str)
        .or_else(|| env("STORAGE_BACKEND").as_deref().and_then(StorageBackend::from_str))
        .unwrap_or_default();

    let database_path = storage
        .and_then(|s| s.path)
        .or_else(|| env("DATABASE_PATH"))
        .map(PathBuf::from)
        .unwrap_or_else(|| storage_backend.default_path());

    let maintenance_interval = Duration::from_secs(
        server
            .and_then(|s| s.maintenance_check_secs)
            .unwrap_or(MAINTENANCE_CHECK_SECS)
            .max(1),
    );

    let config = AppConfig {
        port,
        storage_backend,
        database_path,
        maintenance_interval,
        audio_dir: PathBuf::from(paths::audio_dir()),
    };
    tracing::info!(
        port = config.port,
        backend = config.storage_backend.as_str(),
        path = %config.database_path.display(),
        "Resolved configuration"
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = resolve(FileConfig::default(), env_of(&[]));
        assert_eq!(config.port, SERVER_PORT);
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert!(config.database_path.ends_with("vocab.db"));
        assert_eq!(config.maintenance_interval, Duration::from_secs(MAINTENANCE_CHECK_SECS));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_of(&[("PORT", "3005"), ("STORAGE_BACKEND", "JSON")]);
        let config = resolve(FileConfig::default(), env);
        assert_eq!(config.port, 3005);
        assert_eq!(config.storage_backend, StorageBackend::Json);
        assert!(config.database_path.ends_with("storage.json"));
        assert_eq!(config.bind_addr(), "0.0.0.0:3005");
    }

    #[test]
    fn test_file_overrides_env() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            port = 4000

            [storage]
            backend = "json"
            path = "/tmp/vocab.json"
            "#,
        )
        .unwrap();
        let env = env_of(&[("PORT", "3005"), ("DATABASE_PATH", "/elsewhere.db")]);
        let config = resolve(file, env);
        assert_eq!(config.port, 4000);
        assert_eq!(config.storage_backend, StorageBackend::Json);
        assert_eq!(config.database_path, PathBuf::from("/tmp/vocab.json"));
    }

    #[test]
    fn test_invalid_env_values_fall_back() {
        let env = env_of(&[("PORT", "not-a-port"), ("STORAGE_BACKEND", "redis")]);
        let config = resolve(FileConfig::default(), env);
        assert_eq!(config.port, SERVER_PORT);
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
    }
}
