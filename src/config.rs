//! Configuration types.

use std::net::SocketAddr;

use crate::error::ConfigError;

/// Environment variable holding the upstream collection service base URL.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Service configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Base URL of the upstream collection service. Submissions go to
    /// `{base}/survey`. `None` makes every submission fail.
    pub api_base_url: Option<String>,
    /// Address the HTTP server listens on.
    pub bind_addr: String,
    /// Port the HTTP server listens on.
    pub port: u16,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl SurveyConfig {
    /// Build the configuration from `API_BASE_URL`, `SURVEY_BIND_ADDR` and
    /// `SURVEY_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup(API_BASE_URL_ENV)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let bind_addr = lookup("SURVEY_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let port = match lookup("SURVEY_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "SURVEY_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        Ok(Self {
            api_base_url,
            bind_addr,
            port,
        })
    }

    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "SURVEY_BIND_ADDR".to_string(),
                message: format!("{}: {e}", self.bind_addr),
            })
    }
}
