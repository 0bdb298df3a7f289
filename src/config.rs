use crate::error::AppError;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.opendota.com/api";
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub requests_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = lookup("OPENDOTA_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = lookup("OPENDOTA_API_KEY").filter(|key| !key.trim().is_empty());

        let requests_per_minute = match lookup("OPENDOTA_REQUESTS_PER_MINUTE") {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                AppError::ConfigError(format!(
                    "OPENDOTA_REQUESTS_PER_MINUTE must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_REQUESTS_PER_MINUTE,
        };

        Ok(Config {
            base_url,
            api_key,
            requests_per_minute,
        })
    }
}
