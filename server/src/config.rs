//! Process configuration read from the environment.
//!
//! - `HOST`: bind address (default `127.0.0.1`)
//! - `PORT`: bind port (default `3000`)
//! - `DATABASE_PATH`: SQLite file (default `todoApplication.db`)
//!
//! `main` loads a `.env` file first when one is present.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_PATH: &str = "todoApplication.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),

    #[error("HOST must be an IP address, got `{0}`")]
    InvalidHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidHost(host.clone()))?;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(path) = get("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
