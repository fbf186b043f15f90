use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub geocoder_base_url: String,
    pub geocoder_api_key: String,
    pub directions_base_url: String,
    pub directions_api_key: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| "https://api.geoapify.com".to_string()),
            geocoder_api_key: env::var("GEOCODER_API_KEY").unwrap_or_default(),
            directions_base_url: env::var("DIRECTIONS_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            directions_api_key: env::var("DIRECTIONS_API_KEY").unwrap_or_default(),
            request_timeout_secs: parse_or_default("REQUEST_TIMEOUT_SECS", 10)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
