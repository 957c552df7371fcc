//! Forecast screen state.
//!
//! Holds the load state and the displayed `(location, forecast)` pair. Every
//! trigger bumps a generation counter; completions tagged with an older
//! generation are discarded in `poll_channel`, so a slow fetch can never
//! overwrite a newer one.

use std::sync::mpsc;
use std::sync::Arc;

use owl_core::{AppError, LoadState};
use owl_weather::{AreaForecast, GeocodedLocation};

use crate::app_services::AppServices;
use crate::models::{Listeners, SubscriptionId};
use crate::services::forecast_service::{
    request_fetch, FetchTrigger, ForecastError, ForecastServiceMessage,
};

pub struct ForecastModel {
    services: Arc<AppServices>,
    state: LoadState,
    /// Kept while a newer fetch is loading or after it failed
    area_forecast: Option<AreaForecast>,
    error: Option<ForecastError>,
    generation: u64,
    tx: mpsc::Sender<ForecastServiceMessage>,
    rx: mpsc::Receiver<ForecastServiceMessage>,
    listeners: Listeners<ForecastModel>,
}

impl ForecastModel {
    pub fn new(services: Arc<AppServices>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            services,
            state: LoadState::Idle,
            area_forecast: None,
            error: None,
            generation: 0,
            tx,
            rx,
            listeners: Listeners::default(),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn area_forecast(&self) -> Option<&AreaForecast> {
        self.area_forecast.as_ref()
    }

    pub fn error(&self) -> Option<&ForecastError> {
        self.error.as_ref()
    }

    /// Short message for the error banner, if the last fetch failed.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error
            .clone()
            .map(|e| AppError::from(e).user_message())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscribe(&mut self, listener: impl Fn(&ForecastModel) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Text submitted from the search bar. Blank text is ignored.
    pub fn submit_query(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring blank forecast query");
            return false;
        }
        self.trigger(FetchTrigger::Query(text.to_string()));
        true
    }

    /// A suggestion picked from the result list.
    pub fn select(&mut self, location: GeocodedLocation) {
        self.trigger(FetchTrigger::Selected(location));
    }

    /// Device coordinates became available.
    pub fn use_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.trigger(FetchTrigger::Coordinates {
            latitude,
            longitude,
        });
    }

    /// The device location could not be determined.
    pub fn location_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!("Device location unavailable: {}", reason);
        self.generation += 1;
        self.state = self.state.on_failed();
        self.error = Some(ForecastError::LocationUnavailable(reason));
        self.notify();
    }

    fn trigger(&mut self, trigger: FetchTrigger) {
        self.generation += 1;
        self.state = self.state.on_trigger();
        self.error = None;
        self.notify();

        let settings = self.services.search_settings();
        request_fetch(
            &self.tx,
            &self.services.runtime(),
            self.services.resolver(),
            self.services.provider(),
            trigger,
            settings.result_limit,
            self.generation,
        );
    }

    /// Apply finished fetches. Returns true when the holder changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ForecastServiceMessage::FetchDone { generation, result } => {
                    if generation != self.generation {
                        tracing::debug!(
                            "Dropping stale forecast (generation {}, current {})",
                            generation,
                            self.generation
                        );
                        continue;
                    }
                    self.apply(result);
                    changed = true;
                }
            }
        }
        changed
    }

    fn apply(&mut self, result: Result<Option<AreaForecast>, ForecastError>) {
        match result {
            Ok(Some(area)) => {
                self.state = self.state.on_completed(true);
                self.area_forecast = Some(area);
            }
            Ok(None) => {
                self.state = self.state.on_completed(false);
                self.area_forecast = None;
            }
            Err(e) => {
                tracing::error!("Forecast fetch failed: {}", e);
                self.state = self.state.on_failed();
                self.error = Some(e);
            }
        }
        self.notify();
    }

    /// Fetch the forecast for the last saved location, if there is one.
    pub fn restore_last_search(&mut self) -> Option<GeocodedLocation> {
        let saved = match self.services.last_search().load() {
            Ok(saved) => saved?,
            Err(e) => {
                tracing::warn!("Ignoring last search: {}", e);
                return None;
            }
        };

        let location = saved.location;
        self.select(location.clone());
        Some(location)
    }

    /// Save the displayed location when a forecast is loaded.
    /// Returns whether anything was saved.
    pub fn persist_last_search(&self) -> Result<bool, owl_weather::WeatherError> {
        match (&self.state, &self.area_forecast) {
            (LoadState::Loaded, Some(area)) => {
                self.services.last_search().save(&area.location)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn notify(&self) {
        self.listeners.notify(self);
    }
}

impl std::fmt::Debug for ForecastModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastModel")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("has_forecast", &self.area_forecast.is_some())
            .field("listeners", &self.listeners)
            .finish()
    }
}
