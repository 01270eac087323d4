//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `INVENTORY_API_URL` - Base URL of the hosted backend. Unset runs against the in-memory backend.
//! - `INVENTORY_API_KEY` - API key for the hosted backend (required when `INVENTORY_API_URL` is set)
//! - `INVENTORY_PREFS_PATH` - Theme preference file (default: inventory-prefs.json)
//! - `INVENTORY_LOW_STOCK_THRESHOLD` - Stock level counted as low (default: 10)
//! - `INVENTORY_CHANNEL_BUFFER` - Table actor mailbox size (default: 32)

use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_PREFS_PATH: &str = "inventory-prefs.json";
const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;
const DEFAULT_CHANNEL_BUFFER: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Hosted backend connection.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ApiConfig {
    pub url: String,
    pub api_key: SecretString,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `None` selects the in-memory backend.
    pub api: Option<ApiConfig>,
    pub prefs_path: PathBuf,
    pub low_stock_threshold: u32,
    pub channel_buffer: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: None,
            prefs_path: PathBuf::from(DEFAULT_PREFS_PATH),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a set variable fails to parse, or if the API URL is set without a key.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api = match get("INVENTORY_API_URL") {
            Some(url) => {
                let api_key = get("INVENTORY_API_KEY")
                    .ok_or_else(|| ConfigError::MissingEnvVar("INVENTORY_API_KEY".to_string()))?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::InvalidEnvVar(
                        "INVENTORY_API_URL".to_string(),
                        "must start with http:// or https://".to_string(),
                    ));
                }
                Some(ApiConfig {
                    url,
                    api_key: SecretString::from(api_key),
                })
            }
            None => None,
        };

        let channel_buffer: usize =
            parse_or_default(get("INVENTORY_CHANNEL_BUFFER"), "INVENTORY_CHANNEL_BUFFER", DEFAULT_CHANNEL_BUFFER)?;
        if channel_buffer == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "INVENTORY_CHANNEL_BUFFER".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api,
            prefs_path: get("INVENTORY_PREFS_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH), PathBuf::from),
            low_stock_threshold: parse_or_default(
                get("INVENTORY_LOW_STOCK_THRESHOLD"),
                "INVENTORY_LOW_STOCK_THRESHOLD",
                DEFAULT_LOW_STOCK_THRESHOLD,
            )?,
            channel_buffer,
        })
    }
}

fn parse_or_default<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.api.is_none());
        assert_eq!(config.prefs_path, PathBuf::from("inventory-prefs.json"));
        assert_eq!(config.low_stock_threshold, 10);
        assert_eq!(config.channel_buffer, 32);
    }

    #[test]
    fn test_api_requires_key() {
        let result = DashboardConfig::from_lookup(lookup(&[(
            "INVENTORY_API_URL",
            "https://demo.example.co",
        )]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingEnvVar("INVENTORY_API_KEY".into())
        );
    }

    #[test]
    fn test_full_config() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("INVENTORY_API_URL", "https://demo.example.co"),
            ("INVENTORY_API_KEY", "anon-key"),
            ("INVENTORY_PREFS_PATH", "/tmp/theme.json"),
            ("INVENTORY_LOW_STOCK_THRESHOLD", "5"),
            ("INVENTORY_CHANNEL_BUFFER", "64"),
        ]))
        .unwrap();

        let api = config.api.as_ref().unwrap();
        assert_eq!(api.url, "https://demo.example.co");
        assert_eq!(api.api_key.expose_secret(), "anon-key");
        assert_eq!(config.prefs_path, PathBuf::from("/tmp/theme.json"));
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.channel_buffer, 64);
        assert!(!format!("{config:?}").contains("anon-key"));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = DashboardConfig::from_lookup(lookup(&[("INVENTORY_LOW_STOCK_THRESHOLD", "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "INVENTORY_LOW_STOCK_THRESHOLD"));

        let err = DashboardConfig::from_lookup(lookup(&[("INVENTORY_CHANNEL_BUFFER", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "INVENTORY_CHANNEL_BUFFER"));
    }

    #[test]
    fn test_invalid_url() {
        let err = DashboardConfig::from_lookup(lookup(&[
            ("INVENTORY_API_URL", "demo.example.co"),
            ("INVENTORY_API_KEY", "anon-key"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "INVENTORY_API_URL"));
    }
}
