use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::env;

pub const DEFAULT_TIME_ZONE: &str = "Asia/Manila";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub time_zone: Tz,
    pub regular_hours_cap: f64,
    pub overtime_limit_hours: f64,
    pub overtime_min_hours: f64,
    pub schedule_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        let time_zone_name =
            env::var("TIME_ZONE").unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_string());
        let time_zone = time_zone_name
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("TIME_ZONE `{}` is not a known zone", time_zone_name))?;

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/timekeeping".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            time_zone,
            regular_hours_cap: parse_or("REGULAR_HOURS_CAP", 8.0),
            overtime_limit_hours: parse_or("OVERTIME_LIMIT_HOURS", 4.0),
            overtime_min_hours: parse_or("OVERTIME_MIN_HOURS", 0.5),
            schedule_cache_ttl_secs: parse_or("SCHEDULE_CACHE_TTL_SECS", 60),
        })
    }

    /// Deterministic configuration for tests; never reads the environment.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://@localhost:5432/timekeeping_test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            time_zone: chrono_tz::Asia::Manila,
            regular_hours_cap: 8.0,
            overtime_limit_hours: 4.0,
            overtime_min_hours: 0.5,
            schedule_cache_ttl_secs: 60,
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
