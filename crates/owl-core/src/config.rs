use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "OWL_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Remote service endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// Search-as-you-type tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeather `appid`. Falls back to `OWL_API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Base URL of the geocoding endpoints (`direct`, `reverse`)
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://api.openweathermap.org/geo/1.0/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            weather_base_url: default_weather_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a typed query is looked up
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Settled queries held while the lookup side is busy (oldest dropped first)
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Candidates requested per lookup
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Entries kept per lookup cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_buffer_capacity() -> usize {
    1
}

fn default_result_limit() -> usize {
    5
}

fn default_cache_capacity() -> usize {
    32
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            buffer_capacity: default_buffer_capacity(),
            result_limit: default_result_limit(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Kelvin
    Standard,
    /// Celsius
    Metric,
    /// Fahrenheit
    #[default]
    Imperial,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Temperature unit preference
    #[serde(default)]
    pub units: TemperatureUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("owl");

        Self {
            config_dir,
            api: ApiConfig::default(),
            search: SearchConfig::default(),
            weather: WeatherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            // The key stays in the environment, not on disk
            let mut on_disk = config.clone();
            on_disk.api.api_key = None;
            on_disk.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;

        if config.api.api_key.is_none() {
            config.api.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    /// Warnings are logged, so install the subscriber first or use
    /// [`Config::load`] followed by [`Config::check`].
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.check()?;
        Ok((config, validation))
    }

    /// Validate, failing on errors and logging each warning.
    pub fn check(&self) -> Result<ValidationResult> {
        let validation = self.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.weather_base_url, "api.weather_base_url", &mut result);
        self.validate_url(
            &self.api.geocoding_base_url,
            "api.geocoding_base_url",
            &mut result,
        );

        match self.api.api_key.as_deref() {
            None => result.add_warning(
                "api.api_key",
                format!("No API key configured - set it here or via {}", API_KEY_ENV),
            ),
            Some(key) if key.trim().is_empty() => {
                result.add_error("api.api_key", "API key cannot be empty if provided")
            }
            Some(_) => {}
        }

        if self.api.timeout_secs == 0 {
            result.add_error("api.timeout_secs", "Timeout must be greater than 0");
        } else if self.api.timeout_secs > 300 {
            result.add_warning("api.timeout_secs", "Timeout is unusually long (>300s)");
        }

        if self.search.debounce_ms == 0 {
            result.add_warning(
                "search.debounce_ms",
                "Debounce disabled (0 ms) - every keystroke triggers a lookup",
            );
        }

        if self.search.buffer_capacity == 0 {
            result.add_error(
                "search.buffer_capacity",
                "Buffer capacity must be greater than 0",
            );
        }

        if self.search.result_limit == 0 {
            result.add_error("search.result_limit", "Result limit must be greater than 0");
        } else if self.search.result_limit > 5 {
            result.add_warning(
                "search.result_limit",
                "The geocoding service returns at most 5 results",
            );
        }

        if self.search.cache_capacity == 0 {
            result.add_error(
                "search.cache_capacity",
                "Cache capacity must be greater than 0",
            );
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            result.add_warning(
                "logging.level",
                format!(
                    "Unknown log level '{}', expected one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("owl");

        Ok(config_dir.join("config.toml"))
    }
}
