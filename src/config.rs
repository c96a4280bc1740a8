use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Server-level settings read from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    /// Postgres is used when set, in-memory stores otherwise
    pub database_url: Option<String>,
    pub leaderboard_default_limit: usize,
    pub history_default_page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_url: None,
            leaderboard_default_limit: 50,
            history_default_page_size: 20,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            leaderboard_default_limit: parse_or(
                &lookup,
                "LEADERBOARD_DEFAULT_LIMIT",
                defaults.leaderboard_default_limit,
            )?,
            history_default_page_size: parse_or(
                &lookup,
                "HISTORY_DEFAULT_PAGE_SIZE",
                defaults.history_default_page_size,
            )?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
