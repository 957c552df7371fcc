//! OpenWeather Geo 1.0 client: place name to coordinates and back.

use crate::types::{FailureCause, GeocodedLocation, LookupFailure, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub(crate) const USER_AGENT: &str = concat!("owl/", env!("CARGO_PKG_VERSION"));

/// Where and how to reach one OpenWeather endpoint family.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// Base URL with a guaranteed trailing slash so `join` appends.
    pub(crate) fn base(&self) -> Result<Url, url::ParseError> {
        if self.base_url.ends_with('/') {
            Url::parse(&self.base_url)
        } else {
            Url::parse(&format!("{}/", self.base_url))
        }
    }

    pub(crate) fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingRecord {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
    #[serde(default)]
    state: Option<String>,
}

impl From<GeocodingRecord> for GeocodedLocation {
    fn from(record: GeocodingRecord) -> Self {
        GeocodedLocation {
            latitude: record.lat,
            longitude: record.lon,
            name: record.name,
            country: record.country,
            state: record.state,
        }
    }
}

/// Remote geocoding lookups. Results are returned as the service ordered
/// them; an empty list is a valid answer at this level.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Arc<Client>,
    base: Url,
    api_key: String,
}

impl GeocodingClient {
    pub fn new(config: &EndpointConfig) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(config.http_client()?),
            base: config.base()?,
            api_key: config.api_key.clone(),
        })
    }

    /// Forward lookup: `GET {base}/direct?q=&limit=&appid=`.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn direct(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<GeocodedLocation>, LookupFailure> {
        let mut url = self
            .base
            .join("direct")
            .map_err(|e| LookupFailure::new(query, e))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("appid", &self.api_key);

        self.get(url, query).await
    }

    /// Reverse lookup: `GET {base}/reverse?lat=&lon=&limit=&appid=`.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        limit: u32,
    ) -> Result<Vec<GeocodedLocation>, LookupFailure> {
        let key = coordinate_key(latitude, longitude);
        let mut url = self
            .base
            .join("reverse")
            .map_err(|e| LookupFailure::new(key.as_str(), e))?;
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lon", &longitude.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("appid", &self.api_key);

        self.get(url, &key).await
    }

    async fn get(&self, url: Url, key: &str) -> Result<Vec<GeocodedLocation>, LookupFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupFailure::new(key, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocoding returned status {} for {}", status, key);
            return Err(LookupFailure::new(key, FailureCause::Status(status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupFailure::new(key, e))?;
        let records: Vec<GeocodingRecord> =
            serde_json::from_str(&body).map_err(|e| LookupFailure::new(key, e))?;

        tracing::debug!("Geocoding returned {} result(s) for {}", records.len(), key);
        Ok(records.into_iter().map(GeocodedLocation::from).collect())
    }
}

/// Key used in logs and failures for a coordinate lookup.
pub(crate) fn coordinate_key(latitude: f64, longitude: f64) -> String {
    format!("{},{}", latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_gets_trailing_slash() {
        let config = EndpointConfig::new(
            "https://api.openweathermap.org/geo/1.0",
            "key",
            Duration::from_secs(10),
        );
        let base = config.base().unwrap();
        assert_eq!(
            base.join("direct").unwrap().as_str(),
            "https://api.openweathermap.org/geo/1.0/direct"
        );
    }

    #[test]
    fn test_record_maps_to_location() {
        let json = r#"{"name":"Jersey City","local_names":{"en":"Jersey City"},"lat":40.7282,"lon":-74.0776,"country":"US","state":"New Jersey"}"#;
        let record: GeocodingRecord = serde_json::from_str(json).unwrap();
        let loc = GeocodedLocation::from(record);
        assert_eq!(loc.name, "Jersey City");
        assert_eq!(loc.state.as_deref(), Some("New Jersey"));
        assert_eq!(loc.latitude, 40.7282);
    }

    #[test]
    fn test_coordinate_key() {
        assert_eq!(coordinate_key(40.7225, -74.0422), "40.7225,-74.0422");
    }
}
