// src/config.rs
use std::env;
use std::path::PathBuf;

use crate::domain::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "actix_web=info,auction_bids=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Journal file; bids are kept in memory only when unset.
    pub data_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: None,
        }
    }
}

impl Settings {
    /// Reads `AUCTION_HOST`, `AUCTION_PORT` and `AUCTION_DATA_FILE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let host = lookup("AUCTION_HOST").unwrap_or(defaults.host);
        let port = match lookup("AUCTION_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidSetting {
                name: "AUCTION_PORT",
                value,
            })?,
            None => defaults.port,
        };
        let data_file = lookup("AUCTION_DATA_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Settings { host, port, data_file })
    }
}
