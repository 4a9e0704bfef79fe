//! Runtime settings read from the environment. A `.env` file in the working
//! directory is honoured outside of tests.

use std::path::PathBuf;

use tracing::Level;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_STORAGE_PATH: &str = ".praktik/storage.yaml";
const DEFAULT_ADMIN_PATH: &str = "/admin";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    /// REST API base URL, without a trailing slash
    pub api_url: String,
    pub storage_path: PathBuf,
    /// Path the admin console lives under; navigation URLs are built on it.
    pub admin_path: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenv::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = var("PRAKTIK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "PRAKTIK_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_url),
            ));
        }
        let api_url = api_url.trim_end_matches('/').to_string();

        let storage_path = var("PRAKTIK_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH));

        let admin_path = var("PRAKTIK_ADMIN_PATH").unwrap_or_else(|| DEFAULT_ADMIN_PATH.to_string());
        let admin_path = format!("/{}", admin_path.trim_matches('/'));

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_url,
            storage_path,
            admin_path,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.storage_path, PathBuf::from(".praktik/storage.yaml"));
        assert_eq!(config.admin_path, "/admin");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("PRAKTIK_API_URL", "  "), ("RUST_LOG", "")]).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn url_is_trimmed_and_checked() {
        let config = load(&[("PRAKTIK_API_URL", "https://api.praktik.ai/")]).unwrap();
        assert_eq!(config.api_url, "https://api.praktik.ai");

        let err = load(&[("PRAKTIK_API_URL", "api.praktik.ai")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "PRAKTIK_API_URL"));
    }

    #[test]
    fn admin_path_is_normalized() {
        let config = load(&[("PRAKTIK_ADMIN_PATH", "sprava/")]).unwrap();
        assert_eq!(config.admin_path, "/sprava");
    }

    #[test]
    fn log_level() {
        assert_eq!(load(&[("RUST_LOG", "debug")]).unwrap().log_level, Level::DEBUG);
        assert!(load(&[("RUST_LOG", "chatty")]).is_err());
    }
}
