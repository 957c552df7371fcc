pub mod forecast_service;
pub mod search_service;

pub use forecast_service::{
    request_fetch as request_forecast_fetch, FetchTrigger, ForecastError,
    ForecastServiceMessage,
};
pub use search_service::{SearchError, SearchServiceMessage, SearchSession};

use owl_core::NetworkError;
use owl_weather::FailureCause;

/// Transport failures, where no status came back at all.
pub(crate) fn network_error(cause: &FailureCause) -> Option<NetworkError> {
    if cause.is_timeout() {
        Some(NetworkError::Timeout)
    } else if cause.is_transport() {
        Some(NetworkError::ConnectionFailed(cause.to_string()))
    } else {
        None
    }
}
