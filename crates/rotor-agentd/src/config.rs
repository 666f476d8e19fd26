use std::{net::IpAddr, net::SocketAddr, str::FromStr, time::Duration};

use rotor_core::{ManagerConfig, log::DEFAULT_LOG_CAPACITY};
use rotor_observe::LoggerFormat;
use rotor_remote::GraphConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Daemon settings read from the environment.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub log_format: LoggerFormat,
    pub graph_url: String,
    pub call_timeout: Duration,
    pub log_capacity: usize,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset and blank variables take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind: parse_or(&get, "ROTOR_BIND", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&get, "PORT", 5000)?,
            log_level: get("ROTOR_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: parse_or(&get, "ROTOR_LOG_FORMAT", LoggerFormat::Text)?,
            graph_url: get("ROTOR_GRAPH_URL")
                .unwrap_or_else(|| "https://graph.facebook.com".to_string()),
            call_timeout: Duration::from_millis(parse_or(&get, "ROTOR_CALL_TIMEOUT_MS", 15_000)?),
            log_capacity: parse_or(&get, "ROTOR_LOG_CAPACITY", DEFAULT_LOG_CAPACITY)?,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Client timeout follows `call_timeout`, as the worker bound does.
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            base_url: self.graph_url.clone(),
            timeout: self.call_timeout,
        }
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            log_capacity: self.log_capacity,
            call_timeout: self.call_timeout,
            ..ManagerConfig::default()
        }
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
