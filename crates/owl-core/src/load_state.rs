//! Forecast load state machine.
//!
//! Any trigger re-enters `Loading`; a completion settles into one of the
//! terminal states. Used by ForecastModel.

/// Load state for the forecast screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Empty,
    Error,
}

impl LoadState {
    /// State after a fetch has been triggered. Valid from every state.
    pub fn on_trigger(self) -> Self {
        LoadState::Loading
    }

    /// State after a fetch completed; `has_forecast` is false when the
    /// weather service answered without a body.
    pub fn on_completed(self, has_forecast: bool) -> Self {
        if has_forecast {
            LoadState::Loaded
        } else {
            LoadState::Empty
        }
    }

    /// State after resolution or fetch failed.
    pub fn on_failed(self) -> Self {
        LoadState::Error
    }

    /// True while a fetch is in flight.
    pub fn is_loading(self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// True once a fetch has settled.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Empty | LoadState::Error)
    }

    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Empty => "empty",
            LoadState::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(LoadState::default(), LoadState::Idle);
        assert!(!LoadState::Idle.is_terminal());
    }

    #[test]
    fn every_state_reenters_loading() {
        for state in [
            LoadState::Idle,
            LoadState::Loading,
            LoadState::Loaded,
            LoadState::Empty,
            LoadState::Error,
        ] {
            assert_eq!(state.on_trigger(), LoadState::Loading);
        }
    }

    #[test]
    fn completion_with_forecast_is_loaded() {
        assert_eq!(LoadState::Loading.on_completed(true), LoadState::Loaded);
    }

    #[test]
    fn completion_without_forecast_is_empty_not_error() {
        assert_eq!(LoadState::Loading.on_completed(false), LoadState::Empty);
    }

    #[test]
    fn failure_transitions_to_error() {
        assert_eq!(LoadState::Loading.on_failed(), LoadState::Error);
        assert!(LoadState::Error.is_terminal());
    }

    #[test]
    fn loading_is_not_terminal() {
        assert!(LoadState::Loading.is_loading());
        assert!(!LoadState::Loading.is_terminal());
    }
}
