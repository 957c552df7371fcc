//! Centralized error types for the Owl application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Lower-level errors convert into this type at the UI boundary.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodingError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Geocoding(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// The request never got an answer from the service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
        }
    }
}

/// Place-name lookup errors.
#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("No place matches: {0}")]
    NotFound(String),

    #[error("Geocoding lookup failed for {key}: {message}")]
    LookupFailed { key: String, message: String },

    #[error("Invalid API key")]
    InvalidApiKey,
}

impl GeocodingError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GeocodingError::NotFound(_) => "Place not found. Check the name and try again.",
            GeocodingError::LookupFailed { .. } => "Unable to look up that place. Please try again.",
            GeocodingError::InvalidApiKey => "Weather API key is invalid. Check settings.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Weather API error: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationUnavailable(_) => {
                "Your location is unavailable. Search for a place instead."
            }
            WeatherError::ApiError(_) => {
                "Unable to fetch a forecast for this area, please try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Network(NetworkError::ConnectionFailed("refused".into())),
            AppError::Geocoding(GeocodingError::NotFound("nowhere".into())),
            AppError::Weather(WeatherError::LocationUnavailable("denied".into())),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let err = GeocodingError::InvalidApiKey;
        let app_err: AppError = err.into();
        assert!(matches!(
            app_err,
            AppError::Geocoding(GeocodingError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::ApiError("500".into()));
        assert_eq!(
            app_err.user_message(),
            "Unable to fetch a forecast for this area, please try again later."
        );
    }

    #[test]
    fn test_offline_message_mentions_connection() {
        let app_err: AppError = NetworkError::ConnectionFailed("refused".into()).into();
        assert!(app_err.user_message().contains("internet connection"));
    }

    #[test]
    fn test_lookup_failed_display_carries_key() {
        let err = GeocodingError::LookupFailed {
            key: "Jersey City,NJ,US".into(),
            message: "no results".into(),
        };
        assert!(err.to_string().contains("Jersey City,NJ,US"));
    }
}
