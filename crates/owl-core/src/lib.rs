pub mod config;
pub mod error;
pub mod load_state;

pub use config::{
    ApiConfig, Config, LoggingConfig, SearchConfig, TemperatureUnit, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, GeocodingError, NetworkError, WeatherError};
pub use load_state::LoadState;

use anyhow::Result;

/// Initialize logging with the default `info` filter.
pub fn init() -> Result<()> {
    init_with_level("info")
}

/// Initialize logging. `RUST_LOG` wins over `level` when it is set.
pub fn init_with_level(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("Owl core initialized");
    Ok(())
}
