pub mod forecast_model;
pub mod search_model;

pub use forecast_model::ForecastModel;
pub use search_model::SearchModel;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change listeners for a model. Each listener receives the model after
/// every change and reads whatever holder values it needs.
pub(crate) struct Listeners<M> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn Fn(&M)>)>,
}

impl<M> Default for Listeners<M> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<M> Listeners<M> {
    pub(crate) fn subscribe(&mut self, listener: impl Fn(&M) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&self, model: &M) {
        for (_, listener) in &self.entries {
            listener(model);
        }
    }
}

impl<M> std::fmt::Debug for Listeners<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
