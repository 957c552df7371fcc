//! The most recently displayed location, kept across restarts.

use crate::types::{GeocodedLocation, WeatherError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "last_search.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSearch {
    pub location: GeocodedLocation,
    pub saved_at: DateTime<Utc>,
}

/// JSON file holding the last displayed location.
#[derive(Debug, Clone)]
pub struct LastSearchStore {
    path: PathBuf,
}

impl LastSearchStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<LastSearch>, WeatherError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| WeatherError::Storage(format!("Failed to read {:?}: {}", self.path, e)))?;
        let saved: LastSearch = serde_json::from_str(&json)
            .map_err(|e| WeatherError::Storage(format!("Failed to parse {:?}: {}", self.path, e)))?;

        tracing::debug!("Restored last search: {}", saved.location.display_string());
        Ok(Some(saved))
    }

    pub fn save(&self, location: &GeocodedLocation) -> Result<(), WeatherError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| WeatherError::Storage(format!("Failed to create {:?}: {}", parent, e)))?;
        }

        let record = LastSearch {
            location: location.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| WeatherError::Storage(format!("Failed to serialize last search: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| WeatherError::Storage(format!("Failed to write {:?}: {}", self.path, e)))?;

        tracing::info!("Saved last search: {}", location.display_string());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), WeatherError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| WeatherError::Storage(format!("Failed to delete {:?}: {}", self.path, e)))?;
        }
        Ok(())
    }
}
