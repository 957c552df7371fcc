//! Forecast backend: resolve a trigger to a place, then fetch its forecast.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::Arc;

use owl_core::NetworkError;
use owl_weather::{
    AreaForecast, FailureCause, ForecastFailure, GeocodedLocation, LookupFailure, Resolver,
    WeatherProvider,
};
use tokio::runtime::Handle;

use super::network_error;

/// What started a forecast fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchTrigger {
    /// Text submitted from the search bar; resolved by name
    Query(String),
    /// A suggestion picked from the result list; no lookup needed
    Selected(GeocodedLocation),
    /// Device coordinates; resolved by reverse lookup
    Coordinates { latitude: f64, longitude: f64 },
}

/// Error type for forecast operations
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The lookup succeeded but matched nothing
    NotFound(String),
    Lookup { key: String, message: String },
    InvalidApiKey,
    /// No answer from the service at all
    Network(NetworkError),
    Fetch(String),
    LocationUnavailable(String),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::NotFound(key) => write!(f, "No place matches {}", key),
            ForecastError::Lookup { key, message } => {
                write!(f, "Could not geolocate {}: {}", key, message)
            }
            ForecastError::InvalidApiKey => write!(f, "Weather API key rejected"),
            ForecastError::Network(e) => write!(f, "Network error: {}", e),
            ForecastError::Fetch(s) => write!(f, "Forecast error: {}", s),
            ForecastError::LocationUnavailable(s) => write!(f, "Location error: {}", s),
        }
    }
}

impl std::error::Error for ForecastError {}

impl From<&LookupFailure> for ForecastError {
    fn from(e: &LookupFailure) -> Self {
        match e.cause() {
            FailureCause::Empty => ForecastError::NotFound(e.key().to_string()),
            FailureCause::Status(401) => ForecastError::InvalidApiKey,
            cause => match network_error(cause) {
                Some(network) => ForecastError::Network(network),
                None => ForecastError::Lookup {
                    key: e.key().to_string(),
                    message: cause.to_string(),
                },
            },
        }
    }
}

impl From<&ForecastFailure> for ForecastError {
    fn from(e: &ForecastFailure) -> Self {
        match e.cause() {
            FailureCause::Status(401) => ForecastError::InvalidApiKey,
            cause => network_error(cause)
                .map(ForecastError::Network)
                .unwrap_or_else(|| ForecastError::Fetch(e.to_string())),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum ForecastServiceMessage {
    /// `Ok(None)` means the service had no forecast for the place.
    FetchDone {
        generation: u64,
        result: Result<Option<AreaForecast>, ForecastError>,
    },
}

/// Request a forecast for `trigger` asynchronously.
/// Sends `FetchDone` tagged with `generation` on the channel when complete.
pub fn request_fetch(
    tx: &std::sync::mpsc::Sender<ForecastServiceMessage>,
    runtime: &Handle,
    resolver: Arc<Resolver>,
    provider: Arc<WeatherProvider>,
    trigger: FetchTrigger,
    limit: u32,
    generation: u64,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = fetch_area_forecast(&resolver, &provider, trigger, limit).await;
        if tx
            .send(ForecastServiceMessage::FetchDone { generation, result })
            .is_err()
        {
            tracing::debug!("Forecast model gone, dropping generation {}", generation);
        }
    });
}

async fn fetch_area_forecast(
    resolver: &Resolver,
    provider: &WeatherProvider,
    trigger: FetchTrigger,
    limit: u32,
) -> Result<Option<AreaForecast>, ForecastError> {
    let location = match trigger {
        FetchTrigger::Selected(location) => location,
        FetchTrigger::Query(query) => first_match(resolver.lookup_by_name(&query, limit).await)?,
        FetchTrigger::Coordinates {
            latitude,
            longitude,
        } => first_match(
            resolver
                .lookup_by_coordinates(latitude, longitude, limit)
                .await,
        )?,
    };

    tracing::info!("Fetching forecast for {}", location.display_string());

    let forecast = provider
        .fetch(location.latitude, location.longitude)
        .await
        .map_err(|e| {
            tracing::error!("{}", e);
            ForecastError::from(&e)
        })?;

    Ok(forecast.map(|forecast| AreaForecast { location, forecast }))
}

fn first_match(
    result: Result<Vec<GeocodedLocation>, LookupFailure>,
) -> Result<GeocodedLocation, ForecastError> {
    let places = result.map_err(|e| {
        tracing::warn!("{}", e);
        ForecastError::from(&e)
    })?;
    // The resolver never returns an empty success
    places
        .into_iter()
        .next()
        .ok_or_else(|| ForecastError::NotFound(String::new()))
}
