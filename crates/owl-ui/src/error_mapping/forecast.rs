use crate::services::forecast_service::ForecastError;
use owl_core::{AppError, GeocodingError, WeatherError};

impl From<ForecastError> for AppError {
    fn from(e: ForecastError) -> Self {
        match e {
            ForecastError::NotFound(key) => AppError::Geocoding(GeocodingError::NotFound(key)),
            ForecastError::Lookup { key, message } => {
                AppError::Geocoding(GeocodingError::LookupFailed { key, message })
            }
            ForecastError::InvalidApiKey => AppError::Geocoding(GeocodingError::InvalidApiKey),
            ForecastError::Network(e) => AppError::Network(e),
            ForecastError::Fetch(s) => AppError::Weather(WeatherError::ApiError(s)),
            ForecastError::LocationUnavailable(s) => {
                AppError::Weather(WeatherError::LocationUnavailable(s))
            }
        }
    }
}
