//! Runtime configuration
//!
//! Read from environment variables; every value has a default.

use std::env;

use crate::error::ConfigError;

/// Default raw TCP listener address
pub const DEFAULT_TCP_ADDR: &str = "127.0.0.1:5000";

/// Default WebSocket listener address
pub const DEFAULT_WS_ADDR: &str = "127.0.0.1:8080";

/// Address value that disables a listener
const DISABLED: &str = "off";

/// Listener endpoints and delivery policies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Raw TCP listener (None = disabled)
    pub tcp_addr: Option<String>,
    /// WebSocket listener (None = disabled)
    pub ws_addr: Option<String>,
    /// Confirm private messages back to their sender
    pub echo_private: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tcp_addr: Some(DEFAULT_TCP_ADDR.to_string()),
            ws_addr: Some(DEFAULT_WS_ADDR.to_string()),
            echo_private: false,
        }
    }
}

impl Config {
    /// Load from `CHAT_TCP_ADDR`, `CHAT_WS_ADDR` and `CHAT_ECHO_PRIVATE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tcp_addr = match lookup("CHAT_TCP_ADDR") {
            Some(addr) => endpoint(addr),
            None => defaults.tcp_addr,
        };
        let ws_addr = match lookup("CHAT_WS_ADDR") {
            Some(addr) => endpoint(addr),
            None => defaults.ws_addr,
        };
        let echo_private = match lookup("CHAT_ECHO_PRIVATE") {
            Some(value) => parse_bool("CHAT_ECHO_PRIVATE", &value)?,
            None => defaults.echo_private,
        };

        Ok(Self {
            tcp_addr,
            ws_addr,
            echo_private,
        })
    }
}

fn endpoint(addr: String) -> Option<String> {
    let addr = addr.trim();
    if addr.is_empty() || addr.eq_ignore_ascii_case(DISABLED) {
        None
    } else {
        Some(addr.to_string())
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
