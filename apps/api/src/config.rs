use anyhow::{anyhow, Context, Result};

use crate::votes::ledger::DayBoundary;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    /// Header carrying the caller's user id, set by the auth gateway. Lowercase.
    pub identity_header: String,
    /// Offset of server-local midnight from UTC, used for the one-vote-per-day rule.
    pub vote_day_utc_offset_minutes: i32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            identity_header: std::env::var("IDENTITY_HEADER")
                .unwrap_or_else(|_| "x-user-id".to_string())
                .to_ascii_lowercase(),
            vote_day_utc_offset_minutes: parse_env("VOTE_DAY_UTC_OFFSET_MINUTES", 0)?,
        };
        config.day_boundary()?;
        Ok(config)
    }

    pub fn day_boundary(&self) -> Result<DayBoundary> {
        DayBoundary::from_offset_minutes(self.vote_day_utc_offset_minutes).ok_or_else(|| {
            anyhow!(
                "VOTE_DAY_UTC_OFFSET_MINUTES must be within ±1439 (got {})",
                self.vote_day_utc_offset_minutes
            )
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/ideaboard_test".to_string(),
            db_max_connections: 1,
            port: 0,
            rust_log: "debug".to_string(),
            identity_header: "x-user-id".to_string(),
            vote_day_utc_offset_minutes: 0,
        }
    }
}
