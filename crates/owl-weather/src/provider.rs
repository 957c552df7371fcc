use crate::geocode::EndpointConfig;
use crate::types::{FailureCause, Forecast, ForecastFailure, Units, WeatherError};
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Fetches current conditions from the OpenWeather 2.5 API.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base: Url,
    api_key: String,
    units: Units,
}

impl WeatherProvider {
    pub fn new(config: &EndpointConfig, units: Units) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(config.http_client()?),
            base: config.base()?,
            api_key: config.api_key.clone(),
            units,
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// `GET {base}/weather?lat=&lon=&units=&appid=`.
    ///
    /// Returns `Ok(None)` when the service answers successfully without a
    /// body (empty or `null`).
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Forecast>, ForecastFailure> {
        let fail = |cause: FailureCause| ForecastFailure::new(latitude, longitude, cause);

        let mut url = self
            .base
            .join("weather")
            .map_err(|e| fail(e.into()))?;
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lon", &longitude.to_string())
            .append_pair("units", self.units.as_query())
            .append_pair("appid", &self.api_key);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather service returned status {}", status);
            return Err(fail(FailureCause::Status(status.as_u16())));
        }

        let body = response.text().await.map_err(|e| fail(e.into()))?;
        let forecast = parse_forecast(&body).map_err(|e| fail(e.into()))?;

        match &forecast {
            Some(f) => tracing::info!("Fetched forecast for {} ({})", f.name, f.description()),
            None => tracing::info!("Weather service returned no forecast"),
        }
        Ok(forecast)
    }
}

/// Empty and `null` bodies mean "no forecast".
fn parse_forecast(body: &str) -> Result<Option<Forecast>, serde_json::Error> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<Forecast>>(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_body_is_absent() {
        assert!(parse_forecast("").unwrap().is_none());
        assert!(parse_forecast("  \n").unwrap().is_none());
    }

    #[test]
    fn test_parse_null_body_is_absent() {
        assert!(parse_forecast("null").unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(parse_forecast("{\"cod\":").is_err());
    }
}
