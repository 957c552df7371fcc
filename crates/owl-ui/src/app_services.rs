//! Shared services for the UI models.
//!
//! One `AppServices` is built at startup from the loaded `Config` and handed
//! to every model by `Arc`. It owns the resolver (and with it both lookup
//! caches), the weather provider, the last-search store, and the shutdown
//! token every search session hangs off.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use owl_core::{Config, TemperatureUnit};
use owl_weather::{
    EndpointConfig, GeocodingClient, LastSearchStore, Resolver, Units, WeatherError,
    WeatherProvider,
};

use crate::debounce::DebounceSettings;

/// Search tuning taken from `[search]` in the config file.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub debounce: DebounceSettings,
    pub result_limit: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DebounceSettings::default(),
            result_limit: owl_weather::DEFAULT_LIMIT,
        }
    }
}

pub struct AppServices {
    /// Runtime that all network and timer work is spawned on
    runtime: Handle,

    resolver: Arc<Resolver>,

    provider: Arc<WeatherProvider>,

    last_search: LastSearchStore,

    search: SearchSettings,

    /// Parent of every search session token
    shutdown: CancellationToken,
}

impl AppServices {
    pub fn new(config: &Config, runtime: Handle) -> Result<Arc<Self>, WeatherError> {
        let api_key = config.api.api_key.clone().unwrap_or_default();
        let timeout = Duration::from_secs(config.api.timeout_secs);

        let geocoding = EndpointConfig::new(&config.api.geocoding_base_url, &api_key, timeout);
        let weather = EndpointConfig::new(&config.api.weather_base_url, &api_key, timeout);

        let resolver = Resolver::new(
            GeocodingClient::new(&geocoding)?,
            config.search.cache_capacity,
        );
        let provider = WeatherProvider::new(&weather, units_for(config.weather.units))?;

        let search = SearchSettings {
            debounce: DebounceSettings {
                quiet_period: Duration::from_millis(config.search.debounce_ms),
                buffer_capacity: config.search.buffer_capacity,
            },
            result_limit: u32::try_from(config.search.result_limit)
                .unwrap_or(owl_weather::DEFAULT_LIMIT),
        };

        tracing::info!(
            "Services ready (units: {}, cache capacity: {})",
            provider.units().as_query(),
            config.search.cache_capacity
        );

        Ok(Arc::new(Self {
            runtime,
            resolver: Arc::new(resolver),
            provider: Arc::new(provider),
            last_search: LastSearchStore::new(&config.config_dir),
            search,
            shutdown: CancellationToken::new(),
        }))
    }

    pub fn runtime(&self) -> Handle {
        self.runtime.clone()
    }

    pub fn resolver(&self) -> Arc<Resolver> {
        self.resolver.clone()
    }

    pub fn provider(&self) -> Arc<WeatherProvider> {
        self.provider.clone()
    }

    pub fn last_search(&self) -> &LastSearchStore {
        &self.last_search
    }

    pub fn search_settings(&self) -> SearchSettings {
        self.search
    }

    /// Token for a new search session. Cancelled by `shutdown()`.
    pub fn session_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Cancel every live search session.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.shutdown.cancel();
    }
}

/// Forecast request units for the configured temperature unit.
pub fn units_for(unit: TemperatureUnit) -> Units {
    match unit {
        TemperatureUnit::Standard => Units::Standard,
        TemperatureUnit::Metric => Units::Metric,
        TemperatureUnit::Imperial => Units::Imperial,
    }
}
