//! UI-side state for Owl.
//!
//! Models are plain holders owned by the UI thread. Network and timer work is
//! spawned on the shared tokio runtime and comes back over `std::sync::mpsc`;
//! each model applies it in `poll_channel`.

pub mod app_services;
pub mod debounce;
mod error_mapping;
pub mod models;
pub mod services;

pub use app_services::{AppServices, SearchSettings};
pub use debounce::{DebounceSettings, DebouncedQueries, Debouncer, DropOldestBuffer, QueryInput};
pub use models::{ForecastModel, SearchModel, SubscriptionId};
pub use services::{FetchTrigger, ForecastError, SearchError};
