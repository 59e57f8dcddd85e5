//! Configuration management for LAN Drop Server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Host advertised in file URLs; detected from the network interfaces when unset
    pub public_host: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
}

/// Opt-in cleanup of old uploads. Disabled unless `max_age_secs` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    pub max_age_secs: Option<u64>,
    pub sweep_interval_secs: u64,
}

impl RetentionConfig {
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_host: None,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                static_dir: PathBuf::from("public"),
            },
            retention: RetentionConfig {
                max_age_secs: None,
                sweep_interval_secs: 300,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT")?.unwrap_or(defaults.server.port),
                public_host: env::var("PUBLIC_HOST").ok().filter(|h| !h.is_empty()),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                static_dir: env::var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.static_dir),
            },
            retention: RetentionConfig {
                max_age_secs: parse_var("RETENTION_MAX_AGE_SECS")?,
                sweep_interval_secs: parse_var("RETENTION_SWEEP_INTERVAL_SECS")?
                    .unwrap_or(defaults.retention.sweep_interval_secs),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(None),
    }
}
