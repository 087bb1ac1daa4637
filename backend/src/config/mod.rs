//! Application configuration management

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// Output format of the console log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => bail!("Unknown LOG_FORMAT '{}', expected 'json' or 'pretty'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite URL, e.g. `sqlite://./data/warden.db` or `sqlite::memory:`
    pub database_url: String,

    /// Pool size for file-backed databases
    pub database_max_connections: u32,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 5,
            log_format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),

            database_max_connections: match env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(value) => value
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS")?,
                Err(_) => defaults.database_max_connections,
            },

            log_format: match env::var("LOG_FORMAT") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.log_format,
            },
        })
    }

    /// Whether the database only lives as long as its connection
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(Config::default().is_in_memory());

        let file = Config {
            database_url: "sqlite://./data/warden.db".to_string(),
            ..Default::default()
        };
        assert!(!file.is_in_memory());
    }
}
