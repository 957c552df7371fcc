use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Units sent with forecast requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin, meters/second
    Standard,
    /// Celsius, meters/second
    Metric,
    /// Fahrenheit, miles/hour
    #[default]
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Suffix for rendered temperatures
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Standard => "K",
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }
}

/// Weather condition categories mapped from OpenWeather condition ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an OpenWeather condition id to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_condition_id(id: u32) -> Self {
        match id {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            511 => Self::Sleet, // Freezing rain
            502..=504 | 522 | 531 => Self::HeavyRain,
            500..=531 => Self::Rain,
            611..=616 => Self::Sleet,
            600..=622 => Self::Snow,
            701..=781 => Self::Fog,
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Clear, // Unknown ids default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Get icon name
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Fog => "cloud_fog",
            Self::Drizzle => "cloud_rain",
            Self::Rain => "cloud_rain",
            Self::HeavyRain => "cloud_rain",
            Self::Snow => "cloud_snow",
            Self::Sleet => "cloud_snow",
            Self::Thunderstorm => "cloud_lightning",
        }
    }
}

/// A place resolved by the geocoding service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    /// ISO 3166 country code
    pub country: String,
    /// State or region, when the service knows one
    pub state: Option<String>,
}

impl GeocodedLocation {
    /// "Name, State, Country" with absent parts skipped
    pub fn display_string(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), Some(self.country.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Coordinates as reported by the weather service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the condition list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Temperature, pressure and humidity readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa
    pub pressure: f64,
    /// Percent
    pub humidity: f64,
    #[serde(default)]
    pub sea_level: Option<f64>,
    #[serde(default)]
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: u16,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    /// Cloud cover, percent
    pub all: f64,
}

/// Rain or snow accumulation in millimeters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
    /// Unix seconds
    pub sunrise: i64,
    /// Unix seconds
    pub sunset: i64,
}

/// Current conditions for one place, as returned by the weather service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub coord: Coord,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    /// Meters
    #[serde(default)]
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub clouds: Clouds,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub snow: Option<Precipitation>,
    /// Observation time, unix seconds
    pub dt: i64,
    pub sys: Sys,
    /// Place name the service matched the coordinates to
    #[serde(default)]
    pub name: String,
}

impl Forecast {
    /// Category of the primary condition
    pub fn condition(&self) -> WeatherCondition {
        self.weather
            .first()
            .map(|c| WeatherCondition::from_condition_id(c.id))
            .unwrap_or_default()
    }

    /// Service-provided description of the primary condition
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or_else(|| self.condition().description())
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    pub fn sunrise(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sys.sunrise, 0)
    }

    pub fn sunset(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sys.sunset, 0)
    }
}

/// A resolved place together with its forecast
#[derive(Debug, Clone, PartialEq)]
pub struct AreaForecast {
    pub location: GeocodedLocation,
    pub forecast: Forecast,
}

/// Why a remote call failed
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("no results")]
    Empty,
}

impl FailureCause {
    /// The service never answered: connect failure, reset, or timeout
    pub fn is_transport(&self) -> bool {
        matches!(self, FailureCause::Transport(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FailureCause::Transport(e) if e.is_timeout())
    }
}

/// A geocoding lookup that failed, was unsuccessful, or came back empty
#[derive(Debug, thiserror::Error)]
#[error("Could not geolocate {key}: {cause}")]
pub struct LookupFailure {
    key: String,
    #[source]
    cause: FailureCause,
}

impl LookupFailure {
    pub fn new(key: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        Self {
            key: key.into(),
            cause: cause.into(),
        }
    }

    /// The query or coordinate pair that was looked up
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }

    /// True when the service answered successfully with nothing
    pub fn is_empty_result(&self) -> bool {
        matches!(self.cause, FailureCause::Empty)
    }
}

/// A forecast request that failed
#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch forecast for {latitude}, {longitude}: {cause}")]
pub struct ForecastFailure {
    pub latitude: f64,
    pub longitude: f64,
    #[source]
    cause: FailureCause,
}

impl ForecastFailure {
    pub fn new(latitude: f64, longitude: f64, cause: impl Into<FailureCause>) -> Self {
        Self {
            latitude,
            longitude,
            cause: cause.into(),
        }
    }

    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }
}

/// Weather crate errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Lookup(#[from] LookupFailure),
    #[error(transparent)]
    Forecast(#[from] ForecastFailure),
    #[error("Storage error: {0}")]
    Storage(String),
}
