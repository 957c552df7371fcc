//! Maps UI service errors to owl_core::AppError for consistent user-facing messages.
//! Each service has its own module to keep mappings small and readable.

mod forecast;
mod search;
