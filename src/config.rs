use std::env;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Deadline for a whole `/api/analyze*` request, fetch included.
    pub request_timeout: Duration,
    pub fetch: FetchConfig,
    pub analysis: AnalysisOptions,
}

/// Settings for the outbound page fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Knobs for text extraction, tokenizing and reporting.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Tokens with fewer characters than this are dropped.
    pub min_word_len: usize,
    /// Number of words shown in the frequency chart when the caller does not ask.
    pub top_n: usize,
    pub max_top_n: usize,
    /// Also drop `nav`, `header` and `footer` text.
    pub strip_boilerplate: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_word_len: 2,
            top_n: 20,
            max_top_n: 100,
            strip_boilerplate: false,
        }
    }
}

impl AnalysisOptions {
    /// Clamp a requested chart size into `1..=max_top_n`.
    pub fn resolve_top_n(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.top_n).clamp(1, self.max_top_n.max(1))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let fetch_defaults = FetchConfig::default();
        let fetch = FetchConfig {
            timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 10)?),
            connect_timeout: Duration::from_secs(parse_or(&lookup, "CONNECT_TIMEOUT_SECS", 5)?),
            user_agent: lookup("USER_AGENT").unwrap_or(fetch_defaults.user_agent),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", fetch_defaults.max_body_bytes)?,
        };

        let analysis_defaults = AnalysisOptions::default();
        let analysis = AnalysisOptions {
            min_word_len: parse_or(&lookup, "MIN_WORD_LEN", analysis_defaults.min_word_len)?,
            top_n: parse_or(&lookup, "TOP_N", analysis_defaults.top_n)?,
            max_top_n: parse_or(&lookup, "MAX_TOP_N", analysis_defaults.max_top_n)?,
            strip_boilerplate: parse_or(&lookup, "STRIP_BOILERPLATE", analysis_defaults.strip_boilerplate)?,
        };

        if fetch.timeout.is_zero() {
            return Err(AppError::ConfigError("FETCH_TIMEOUT_SECS must be positive".to_string()));
        }

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            fetch,
            analysis,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.analysis.min_word_len, 2);
        assert!(!config.analysis.strip_boilerplate);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("STRIP_BOILERPLATE", "true"),
            ("TOP_N", "5"),
        ])
        .unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.fetch.timeout, Duration::from_secs(3));
        assert!(config.analysis.strip_boilerplate);
        assert_eq!(config.analysis.top_n, 5);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("HOST", "localhost:80")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("FETCH_TIMEOUT_SECS", "0")]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn top_n_is_clamped() {
        let options = AnalysisOptions::default();
        assert_eq!(options.resolve_top_n(None), 20);
        assert_eq!(options.resolve_top_n(Some(0)), 1);
        assert_eq!(options.resolve_top_n(Some(1000)), 100);
    }
}
