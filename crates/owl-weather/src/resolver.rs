//! Cached geocoding lookups.

use crate::cache::{CoordKey, LookupCache, NameKey};
use crate::geocode::{coordinate_key, GeocodingClient};
use crate::types::{FailureCause, GeocodedLocation, LookupFailure};

/// Result count requested from the geocoding service.
pub const DEFAULT_LIMIT: u32 = 5;

/// Resolves place names and coordinates through the geocoding client, with
/// one LRU cache per direction.
///
/// Hits never reach the network. Misses are stored only when the remote
/// lookup succeeded with at least one result. Two concurrent misses on the
/// same key may both reach the network; the later insert wins.
#[derive(Debug)]
pub struct Resolver {
    client: GeocodingClient,
    by_name: LookupCache<NameKey>,
    by_coordinates: LookupCache<CoordKey>,
}

impl Resolver {
    pub fn new(client: GeocodingClient, capacity: usize) -> Self {
        Self {
            client,
            by_name: LookupCache::with_capacity(capacity),
            by_coordinates: LookupCache::with_capacity(capacity),
        }
    }

    /// Places matching `query`, most relevant first.
    ///
    /// `limit` is only sent on a miss. The cache key is the normalized query
    /// alone, so a hit returns whatever was stored, even if it was fetched
    /// with a different limit.
    pub async fn lookup_by_name(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<GeocodedLocation>, LookupFailure> {
        let key = NameKey::new(query);
        if let Some(hit) = self.by_name.get(&key) {
            tracing::debug!("Name cache hit for {:?}", key.as_str());
            return Ok(hit);
        }

        let results = self.client.direct(query, limit).await?;
        if results.is_empty() {
            tracing::debug!("No places match {:?}", query);
            return Err(LookupFailure::new(query, FailureCause::Empty));
        }

        self.by_name.insert(key, results.clone());
        Ok(results)
    }

    /// Places near the given coordinates, nearest first.
    pub async fn lookup_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        limit: u32,
    ) -> Result<Vec<GeocodedLocation>, LookupFailure> {
        let key = CoordKey::new(latitude, longitude);
        if let Some(hit) = self.by_coordinates.get(&key) {
            tracing::debug!("Coordinate cache hit for {}, {}", latitude, longitude);
            return Ok(hit);
        }

        let results = self.client.reverse(latitude, longitude, limit).await?;
        if results.is_empty() {
            return Err(LookupFailure::new(
                coordinate_key(latitude, longitude),
                FailureCause::Empty,
            ));
        }

        self.by_coordinates.insert(key, results.clone());
        Ok(results)
    }

    pub fn name_cache(&self) -> &LookupCache<NameKey> {
        &self.by_name
    }

    pub fn coordinate_cache(&self) -> &LookupCache<CoordKey> {
        &self.by_coordinates
    }
}
