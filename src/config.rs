//! Configuration management

use crate::error::ConfigError;
use crate::validation::PhoneRule;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend URL used by the portal
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the academy REST backend
    pub api_url: String,

    /// Fixed timeout for every request
    pub request_timeout: Duration,

    /// Timeout for the `GET /` connection probe
    pub probe_timeout: Duration,

    /// JSON file backing the durable session storage
    pub session_path: PathBuf,

    /// Phone digit-length rule used by the registration forms
    pub phone_rule: PhoneRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            session_path: default_session_path(),
            phone_rule: PhoneRule::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source; unset keys keep defaults
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = var("ACADEMIA_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let request_timeout = match var("ACADEMIA_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_secs("ACADEMIA_TIMEOUT_SECS", &v)?),
            None => defaults.request_timeout,
        };

        let probe_timeout = match var("ACADEMIA_PROBE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_secs("ACADEMIA_PROBE_TIMEOUT_SECS", &v)?),
            None => defaults.probe_timeout,
        };

        let session_path = var("ACADEMIA_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);

        let phone_rule = match var("ACADEMIA_PHONE_RULE") {
            Some(v) => v.parse::<PhoneRule>().map_err(|_| ConfigError::InvalidValue {
                key: "ACADEMIA_PHONE_RULE",
                value: v,
            })?,
            None => defaults.phone_rule,
        };

        Ok(Self {
            api_url,
            request_timeout,
            probe_timeout,
            session_path,
            phone_rule,
        })
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("academia")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.phone_rule, PhoneRule::AtLeast9);
        assert!(config.session_path.ends_with("academia/session.json"));
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ACADEMIA_API_URL", "https://api.academia.pe/"),
            ("ACADEMIA_TIMEOUT_SECS", "30"),
            ("ACADEMIA_SESSION_PATH", "/tmp/academia.json"),
            ("ACADEMIA_PHONE_RULE", "exact"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.academia.pe");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.session_path, PathBuf::from("/tmp/academia.json"));
        assert_eq!(config.phone_rule, PhoneRule::Exactly9);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("ACADEMIA_PHONE_RULE", "nine")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "ACADEMIA_PHONE_RULE", ref value } if value == "nine"
        ));

        let err = Config::from_lookup(lookup(&[("ACADEMIA_PROBE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "ACADEMIA_PROBE_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.phone_rule, PhoneRule::AtLeast9);
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("K", "30").unwrap(), 30);
        assert_eq!(parse_secs("K", " 7 ").unwrap(), 7);
        assert!(parse_secs("K", "0").is_err());
        assert!(parse_secs("K", "ten").is_err());
    }
}
