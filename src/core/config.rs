//! Configuration management for the MCP server.
//!
//! Configuration is assembled from defaults, an optional `.env` file and
//! environment variables. Every key is optional.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Endpoints used by the `get-weather` tool.
    pub weather: WeatherConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Verbose diagnostics requested through `DEBUG`.
    pub debug: bool,
}

impl LoggingConfig {
    /// The level actually applied; `debug` overrides anything less verbose.
    pub fn effective_level(&self) -> &str {
        if self.debug && !self.level.eq_ignore_ascii_case("trace") {
            "debug"
        } else {
            &self.level
        }
    }
}

/// Remote weather service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Place name to coordinates lookup.
    pub geocoding_url: String,

    /// Current conditions lookup.
    pub forecast_url: String,

    /// Timeout applied to each outbound request.
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "my-first-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                debug: false,
            },
            transport: TransportConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

/// Whether a flag-style variable is switched on.
fn flag_enabled(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server keys are prefixed with `MCP_`; `DEBUG` toggles verbose
    /// diagnostics.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(debug) = std::env::var("DEBUG") {
            config.logging.debug = flag_enabled(&debug);
        }

        config.transport = TransportConfig::from_env();

        if let Ok(url) = std::env::var("MCP_GEOCODING_URL") {
            config.weather.geocoding_url = url;
        }

        if let Ok(url) = std::env::var("MCP_FORECAST_URL") {
            config.weather.forecast_url = url;
        }

        if let Ok(timeout) = std::env::var("MCP_HTTP_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.weather.timeout_secs = secs,
                Err(_) => warn!(
                    "Ignoring invalid MCP_HTTP_TIMEOUT_SECS '{}', using {}s",
                    timeout, config.weather.timeout_secs
                ),
            }
        }

        if config.logging.debug {
            info!("Debug diagnostics enabled");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "my-first-server");
        assert_eq!(config.logging.effective_level(), "info");
        assert_eq!(config.weather.timeout_secs, 10);
        assert!(config.weather.geocoding_url.contains("geocoding-api.open-meteo.com"));
    }

    #[test]
    fn test_debug_forces_debug_level() {
        let logging = LoggingConfig {
            level: "warn".to_string(),
            debug: true,
        };
        assert_eq!(logging.effective_level(), "debug");

        let logging = LoggingConfig {
            level: "trace".to_string(),
            debug: true,
        };
        assert_eq!(logging.effective_level(), "trace");
    }

    #[test]
    fn test_flag_enabled() {
        for on in ["1", "true", "yes", "*"] {
            assert!(flag_enabled(on), "{on}");
        }
        for off in ["", "0", "false", "FALSE", "  "] {
            assert!(!flag_enabled(off), "{off:?}");
        }
    }

    #[test]
    fn test_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "weather-box");
            std::env::set_var("DEBUG", "1");
            std::env::set_var("MCP_HTTP_TIMEOUT_SECS", "3");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "weather-box");
        assert!(config.logging.debug);
        assert_eq!(config.weather.timeout_secs, 3);
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
            std::env::remove_var("DEBUG");
            std::env::remove_var("MCP_HTTP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_HTTP_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.weather.timeout_secs, 10);
        unsafe {
            std::env::remove_var("MCP_HTTP_TIMEOUT_SECS");
        }
    }
}
