//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Environment variables are layered on top by [`Config::apply_env`].

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Root of the Vue Bits checkout (the directory holding `src/content`).
    #[serde(default = "default_vue_bits_path")]
    pub vue_bits_path: PathBuf,

    /// Location of the parsed component cache.
    ///
    /// Defaults to `~/.vue-bits-mcp/components.json`.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            vue_bits_path: default_vue_bits_path(),
            cache_path: None,
            environment: Environment::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "http.port must be between 1 and 65535".to_string(),
            });
        }
        if self.http.keepalive_interval_secs == 0 {
            return Err(ConfigError::ValidationError {
                message: "http.keepalive_interval_secs must be greater than zero".to_string(),
            });
        }
        if self.http.long_running_tools.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "http.long_running_tools must not contain empty names".to_string(),
            });
        }
        Ok(())
    }

    /// Applies `PORT`, `VUE_BITS_PATH`, `NODE_ENV` and `ALLOWED_ORIGINS`
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides using `lookup` to resolve variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationError {
                    message: format!("PORT must be a port number, got '{port}'"),
                })?;
        }

        if let Some(path) = lookup("VUE_BITS_PATH").filter(|p| !p.is_empty()) {
            self.vue_bits_path = PathBuf::from(path);
        }

        if let Some(env) = lookup("NODE_ENV") {
            self.environment = Environment::from_name(&env);
        }

        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.http.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(())
    }

    /// Returns the cache path, falling back to the platform default.
    #[must_use]
    pub fn resolved_cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .or_else(super::default_cache_path)
            .unwrap_or_else(|| PathBuf::from("data").join("components.json"))
    }
}

fn default_vue_bits_path() -> PathBuf {
    PathBuf::from("..")
}

/// Deployment environment, mirrored from `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: localhost origins are always admitted.
    #[default]
    Development,
    /// Production: only configured origins are admitted.
    Production,
}

impl Environment {
    /// Maps an environment name; anything other than `production` is development.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Returns the lowercase name of the environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins admitted by CORS.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Tools whose results are delivered as a single SSE frame.
    #[serde(default = "default_long_running_tools")]
    pub long_running_tools: Vec<String>,

    /// Seconds between keep-alive pings on the `GET /mcp` stream.
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
            long_running_tools: default_long_running_tools(),
            keepalive_interval_secs: default_keepalive_interval(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    10000
}

fn default_long_running_tools() -> Vec<String> {
    vec![
        "search_vue_components".to_string(),
        "analyze_dependencies".to_string(),
    ]
}

const fn default_keepalive_interval() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
