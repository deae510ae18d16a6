//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error reading server configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory holding `stops.txt`, `trips.txt` and `stop_times.txt`.
    pub data_dir: PathBuf,

    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// The one city this deployment serves.
    pub city: String,

    /// Deadline for the dataset-reading part of a request.
    pub query_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("gtfs"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5001)),
            city: "Wroclaw".to_string(),
            query_timeout: Duration::from_millis(5000),
        }
    }
}

impl ServerConfig {
    /// Read `TRANSIT_*` variables, using defaults for any that are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup("TRANSIT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(addr) = lookup("TRANSIT_BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|e: std::net::AddrParseError| {
                invalid("TRANSIT_BIND_ADDR", &addr, e.to_string())
            })?;
        }

        if let Some(city) = lookup("TRANSIT_CITY") {
            if city.trim().is_empty() {
                return Err(invalid("TRANSIT_CITY", &city, "must not be empty"));
            }
            config.city = city.trim().to_string();
        }

        if let Some(ms) = lookup("TRANSIT_QUERY_TIMEOUT_MS") {
            let millis: u64 = ms
                .trim()
                .parse()
                .map_err(|_| invalid("TRANSIT_QUERY_TIMEOUT_MS", &ms, "expected milliseconds"))?;
            if millis == 0 {
                return Err(invalid("TRANSIT_QUERY_TIMEOUT_MS", &ms, "must be positive"));
            }
            config.query_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.port(), 5001);
        assert_eq!(config.city, "Wroclaw");
    }

    #[test]
    fn custom_config() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TRANSIT_DATA_DIR", "/srv/gtfs"),
            ("TRANSIT_BIND_ADDR", "0.0.0.0:8080"),
            ("TRANSIT_CITY", "Krakow"),
            ("TRANSIT_QUERY_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/gtfs"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.city, "Krakow");
        assert_eq!(config.query_timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("TRANSIT_BIND_ADDR", "localhost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TRANSIT_BIND_ADDR", .. }));

        let err = ServerConfig::from_lookup(lookup(&[("TRANSIT_QUERY_TIMEOUT_MS", "0")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "TRANSIT_QUERY_TIMEOUT_MS: invalid value '0': must be positive"
        );

        assert!(ServerConfig::from_lookup(lookup(&[("TRANSIT_CITY", " ")])).is_err());
    }
}
