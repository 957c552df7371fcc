//! Weather lookups for Owl
//!
//! Geocoding and current conditions via the OpenWeather APIs, with bounded
//! per-direction lookup caches and last-search persistence.

pub mod cache;
pub mod geocode;
pub mod last_search;
pub mod provider;
pub mod resolver;
pub mod types;

pub use cache::{CoordKey, LookupCache, NameKey, DEFAULT_CAPACITY};
pub use geocode::{EndpointConfig, GeocodingClient};
pub use last_search::{LastSearch, LastSearchStore};
pub use provider::WeatherProvider;
pub use resolver::{Resolver, DEFAULT_LIMIT};
pub use types::*;
