//! Application configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use civic_client::{ClientConfig, DEFAULT_LIMIT};

use crate::error::CoreError;
use crate::Result;

pub const API_BASE_ENV: &str = "CIVIC_API_BASE";
pub const PAGE_SIZE_ENV: &str = "CIVIC_PAGE_SIZE";

const DEFAULT_API_BASE: &str = "http://localhost:4000";
const DEFAULT_AUTO_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin the REST API and auth endpoints live under
    pub api_base: String,
    /// Reports per page in list views
    pub page_size: u32,
    /// Reload interval for list views with auto refresh on
    pub auto_refresh_secs: u64,
}

impl Config {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            page_size: DEFAULT_LIMIT,
            auto_refresh_secs: DEFAULT_AUTO_REFRESH_SECS,
        }
    }

    /// Read `CIVIC_API_BASE` and `CIVIC_PAGE_SIZE`, defaulting when unset
    pub fn from_env() -> Self {
        let api_base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut config = Self::new(api_base);

        if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => config.page_size = size,
                _ => tracing::warn!(value = %raw, "Ignoring invalid {}", PAGE_SIZE_ENV),
            }
        }

        config
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        ClientConfig::new(&self.api_base).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn auto_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base, "http://localhost:4000");
        assert_eq!(config.page_size, 8);
        assert_eq!(config.auto_refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_client_config() {
        let config = Config::new("https://civic.example.org/");
        let client = config.client_config().unwrap();
        assert_eq!(client.api_base.host_str(), Some("civic.example.org"));

        let broken = Config::new("::nope::");
        assert!(matches!(broken.client_config(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(API_BASE_ENV, "https://api.civic.test");
        std::env::set_var(PAGE_SIZE_ENV, "12");
        let config = Config::from_env();
        assert_eq!(config.api_base, "https://api.civic.test");
        assert_eq!(config.page_size, 12);

        std::env::set_var(PAGE_SIZE_ENV, "zero");
        assert_eq!(Config::from_env().page_size, 8);

        std::env::remove_var(API_BASE_ENV);
        std::env::remove_var(PAGE_SIZE_ENV);
        assert_eq!(Config::from_env().api_base, "http://localhost:4000");
    }
}
