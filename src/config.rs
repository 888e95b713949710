use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub admin_password: Option<String>,
    pub utc_offset_hours: i32,
    pub store_timeout: Duration,
    pub refresh_interval: Duration,
    pub leaderboard_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:study_room.db".to_string());

        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());

        let utc_offset_hours = parse_var("UTC_OFFSET_HOURS", 9)?;
        let store_timeout_secs: u64 = parse_var("STORE_TIMEOUT_SECS", 5)?;
        let refresh_interval_secs: u64 = parse_var("REFRESH_INTERVAL_SECS", 5)?;
        let leaderboard_size = parse_var("LEADERBOARD_SIZE", 10)?;

        Ok(Config {
            database_url,
            admin_password,
            utc_offset_hours,
            store_timeout: Duration::from_secs(store_timeout_secs.max(1)),
            refresh_interval: Duration::from_secs(refresh_interval_secs.clamp(1, 15)),
            leaderboard_size,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, value)),
        Err(_) => Ok(default),
    }
}
