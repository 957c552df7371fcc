use crate::services::search_service::SearchError;
use owl_core::{AppError, GeocodingError};

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NotFound(q) => AppError::Geocoding(GeocodingError::NotFound(q)),
            SearchError::Lookup { key, message } => {
                AppError::Geocoding(GeocodingError::LookupFailed { key, message })
            }
            SearchError::InvalidApiKey => AppError::Geocoding(GeocodingError::InvalidApiKey),
            SearchError::Network(e) => AppError::Network(e),
        }
    }
}
