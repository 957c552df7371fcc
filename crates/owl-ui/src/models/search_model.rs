//! Search bar state: text, expanded flag, and the suggestion list.

use std::sync::mpsc;
use std::sync::Arc;

use owl_core::AppError;
use owl_weather::GeocodedLocation;

use crate::app_services::AppServices;
use crate::models::{Listeners, SubscriptionId};
use crate::services::search_service::{SearchError, SearchServiceMessage, SearchSession};

pub struct SearchModel {
    services: Arc<AppServices>,
    text: String,
    expanded: bool,
    suggestions: Vec<GeocodedLocation>,
    last_error: Option<SearchError>,
    session: Option<SearchSession>,
    next_session: u64,
    tx: mpsc::Sender<SearchServiceMessage>,
    rx: mpsc::Receiver<SearchServiceMessage>,
    listeners: Listeners<SearchModel>,
}

impl SearchModel {
    /// Starts expanded with empty text; `restore` collapses it.
    pub fn new(services: Arc<AppServices>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            services,
            text: String::new(),
            expanded: true,
            suggestions: Vec::new(),
            last_error: None,
            session: None,
            next_session: 0,
            tx,
            rx,
            listeners: Listeners::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn suggestions(&self) -> &[GeocodedLocation] {
        &self.suggestions
    }

    pub fn suggestion(&self, index: usize) -> Option<&GeocodedLocation> {
        self.suggestions.get(index)
    }

    pub fn last_error(&self) -> Option<&SearchError> {
        self.last_error.as_ref()
    }

    pub fn last_error_message(&self) -> Option<&'static str> {
        self.last_error
            .clone()
            .map(|e| AppError::from(e).user_message())
    }

    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(SearchSession::id)
    }

    pub fn subscribe(&mut self, listener: impl Fn(&SearchModel) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// A raw edit of the search text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.expanded = true;
        self.notify();

        if self.session.as_ref().map_or(true, SearchSession::is_cancelled) {
            self.restart_session();
        }
        let pushed = self
            .session
            .as_ref()
            .is_some_and(|session| session.push(self.text.clone()));
        if !pushed {
            tracing::debug!("Search session not running, edit not queued");
        }
    }

    /// Show a restored location in the bar without looking it up.
    pub fn restore(&mut self, location: &GeocodedLocation) {
        self.text = location.display_string();
        self.expanded = false;
        self.notify();
    }

    pub fn expand(&mut self) {
        if !self.expanded {
            self.expanded = true;
            self.notify();
        }
    }

    pub fn collapse(&mut self) {
        if self.expanded {
            self.expanded = false;
            self.notify();
        }
    }

    /// Replace the running session. The old one is cancelled and anything
    /// it still had in flight is ignored.
    pub fn restart_session(&mut self) {
        self.end_session();
        if self.services.is_shutting_down() {
            return;
        }

        self.next_session += 1;
        self.session = Some(SearchSession::start(
            self.next_session,
            &self.services.runtime(),
            self.services.resolver(),
            self.services.search_settings(),
            self.services.session_token(),
            &self.tx,
        ));
    }

    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
    }

    /// Apply finished lookups. Returns true when the holder changed.
    pub fn poll_channel(&mut self) -> bool {
        let current = self.session_id();
        let mut changed = false;

        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                SearchServiceMessage::ResultsReady {
                    session,
                    query,
                    results,
                } => {
                    if Some(session) != current {
                        continue;
                    }
                    tracing::debug!("{} suggestion(s) for {:?}", results.len(), query);
                    self.suggestions = results;
                    self.last_error = None;
                    changed = true;
                }
                SearchServiceMessage::LookupFailed {
                    session,
                    query,
                    error,
                } => {
                    if Some(session) != current {
                        continue;
                    }
                    tracing::debug!("Keeping suggestions after failed lookup for {:?}", query);
                    self.last_error = Some(error);
                    changed = true;
                }
            }
        }

        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        self.listeners.notify(self);
    }
}

impl std::fmt::Debug for SearchModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchModel")
            .field("text", &self.text)
            .field("expanded", &self.expanded)
            .field("suggestions", &self.suggestions.len())
            .field("session", &self.session_id())
            .finish()
    }
}
