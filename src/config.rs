use std::env;

use crate::error::{AppError, AppResult};

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NGO_ID: i64 = 1;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub ngo_id: i64,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Ok(Config {
            api_base_url: normalize_base_url(&api_base_url),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            ngo_id: parse_var("NGO_ID", DEFAULT_NGO_ID)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            ngo_id: DEFAULT_NGO_ID,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}

/// Endpoint paths start with `/`, so the base never keeps its trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://api.local/"), "http://api.local");
        assert_eq!(normalize_base_url(" http://api.local// "), "http://api.local");
        assert_eq!(normalize_base_url("http://api.local"), "http://api.local");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ngo_id, 1);
        assert_eq!(config.http_timeout_secs, 30);
    }
}
