//! Search backend: debounced suggestions while the user types.
//!
//! A session owns one debounce pipeline and one consumer task. Settled
//! queries are looked up one at a time; anything that settles while a lookup
//! is in flight waits in the drop-oldest buffer, so only the newest survives.

use std::sync::Arc;

use owl_core::NetworkError;
use owl_weather::{FailureCause, GeocodedLocation, LookupFailure, Resolver};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::app_services::SearchSettings;
use crate::debounce::{DebouncedQueries, Debouncer, QueryInput};

use super::network_error;

/// Error type for search-time lookups
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    NotFound(String),
    Lookup { key: String, message: String },
    InvalidApiKey,
    Network(NetworkError),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::NotFound(q) => write!(f, "No place matches {}", q),
            SearchError::Lookup { key, message } => {
                write!(f, "Search for {} failed: {}", key, message)
            }
            SearchError::InvalidApiKey => write!(f, "Weather API key rejected"),
            SearchError::Network(e) => write!(f, "Network error: {}", e),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<&LookupFailure> for SearchError {
    fn from(e: &LookupFailure) -> Self {
        match e.cause() {
            FailureCause::Empty => SearchError::NotFound(e.key().to_string()),
            FailureCause::Status(401) => SearchError::InvalidApiKey,
            cause => match network_error(cause) {
                Some(network) => SearchError::Network(network),
                None => SearchError::Lookup {
                    key: e.key().to_string(),
                    message: cause.to_string(),
                },
            },
        }
    }
}

/// Messages sent from a search session back to the UI thread
#[derive(Debug)]
pub enum SearchServiceMessage {
    /// Suggestions for a settled query. Empty queries yield an empty list.
    ResultsReady {
        session: u64,
        query: String,
        results: Vec<GeocodedLocation>,
    },
    /// The lookup failed; the suggestion list should stay as it is
    LookupFailed {
        session: u64,
        query: String,
        error: SearchError,
    },
}

/// A running debounce pipeline plus its consumer. Cancelled on drop.
#[derive(Debug)]
pub struct SearchSession {
    id: u64,
    input: QueryInput,
    cancel: CancellationToken,
}

impl SearchSession {
    pub fn start(
        id: u64,
        runtime: &Handle,
        resolver: Arc<Resolver>,
        settings: SearchSettings,
        cancel: CancellationToken,
        tx: &std::sync::mpsc::Sender<SearchServiceMessage>,
    ) -> Self {
        let (input, queries) = Debouncer::new(settings.debounce).start(runtime, cancel.clone());

        runtime.spawn(consume(
            id,
            queries,
            resolver,
            settings.result_limit,
            cancel.clone(),
            tx.clone(),
        ));

        tracing::debug!("Search session {} started", id);
        Self { id, input, cancel }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Feed a raw edit. Returns false once the session has ended.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.input.push(text)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn consume(
    session: u64,
    mut queries: DebouncedQueries,
    resolver: Arc<Resolver>,
    limit: u32,
    cancel: CancellationToken,
    tx: std::sync::mpsc::Sender<SearchServiceMessage>,
) {
    while let Some(query) = queries.next().await {
        let message = if query.is_empty() {
            SearchServiceMessage::ResultsReady {
                session,
                query,
                results: Vec::new(),
            }
        } else {
            match resolver.lookup_by_name(&query, limit).await {
                Ok(results) => SearchServiceMessage::ResultsReady {
                    session,
                    query,
                    results,
                },
                Err(e) => {
                    tracing::warn!("{}", e);
                    SearchServiceMessage::LookupFailed {
                        session,
                        query,
                        error: SearchError::from(&e),
                    }
                }
            }
        };

        // A lookup can finish after the session was replaced
        if cancel.is_cancelled() {
            break;
        }
        if tx.send(message).is_err() {
            break;
        }
    }

    tracing::debug!("Search session {} ended", session);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_error_display() {
        assert!(format!("{}", SearchError::NotFound("xyz".into())).contains("xyz"));
        assert!(format!(
            "{}",
            SearchError::Lookup {
                key: "ny".into(),
                message: "timeout".into()
            }
        )
        .contains("timeout"));
    }

    #[test]
    fn lookup_failure_maps_to_search_error() {
        let empty = LookupFailure::new("xyz", FailureCause::Empty);
        let denied = LookupFailure::new("xyz", FailureCause::Status(401));
        assert_eq!(SearchError::from(&empty), SearchError::NotFound("xyz".into()));
        assert_eq!(SearchError::from(&denied), SearchError::InvalidApiKey);
    }
}
