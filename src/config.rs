//! Relay configuration parsed from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_CLIENT_BUFFER: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Outbound queue depth per connected client. A full queue drops messages.
    pub client_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR, port: DEFAULT_PORT, client_buffer: DEFAULT_CLIENT_BUFFER }
    }
}

impl RelayConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `RELAY_BIND_ADDR`: default `0.0.0.0`
    /// - `RELAY_CLIENT_BUFFER`: default 256, must be at least 1
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`RelayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let bind_addr = parse_var(&lookup, "RELAY_BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let client_buffer = parse_var(&lookup, "RELAY_CLIENT_BUFFER", DEFAULT_CLIENT_BUFFER)?;
        if client_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "RELAY_CLIENT_BUFFER",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self { bind_addr, port, client_buffer })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid { var, value: raw.clone(), reason: e.to_string() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
