//! Search-as-you-type debouncing.
//!
//! Raw edits go in through a [`QueryInput`]; settled queries come out of a
//! [`DebouncedQueries`]. A value settles once no newer edit arrived for the
//! quiet period. Settled values pass through a drop-oldest buffer so a slow
//! consumer only ever sees the newest intent, and a value equal to the one
//! handed out last is skipped.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);
pub const DEFAULT_BUFFER_CAPACITY: usize = 1;

#[derive(Debug, Clone, Copy)]
pub struct DebounceSettings {
    pub quiet_period: Duration,
    pub buffer_capacity: usize,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Bounded FIFO that evicts the oldest item instead of blocking the producer.
/// Single consumer.
#[derive(Debug)]
pub struct DropOldestBuffer<T> {
    state: Mutex<BufferState<T>>,
    capacity: usize,
    notify: Notify,
}

#[derive(Debug)]
struct BufferState<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> DropOldestBuffer<T> {
    /// Capacity is at least one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(BufferState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            capacity,
            notify: Notify::new(),
        }
    }

    /// Append an item, returning the evicted oldest item when full.
    /// Pushing after close drops the item.
    pub fn push(&self, item: T) -> Option<T> {
        let evicted = {
            let mut state = self.state.lock();
            if state.closed {
                return Some(item);
            }
            let evicted = if state.items.len() >= self.capacity {
                state.items.pop_front()
            } else {
                None
            };
            state.items.push_back(item);
            evicted
        };
        self.notify.notify_one();
        evicted
    }

    /// No more items will be accepted. Buffered items are still delivered.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify.notify_one();
    }

    /// Next item, or `None` once closed and drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            {
                let mut state = self.state.lock();
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Producer side: accepts raw edits without ever blocking.
/// Dropping every clone closes the input.
#[derive(Debug, Clone)]
pub struct QueryInput {
    tx: mpsc::UnboundedSender<String>,
}

impl QueryInput {
    /// Returns false once the pipeline has ended.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side: settled, de-duplicated queries in order.
#[derive(Debug)]
pub struct DebouncedQueries {
    buffer: Arc<DropOldestBuffer<String>>,
    cancel: CancellationToken,
    last_emitted: Option<String>,
}

impl DebouncedQueries {
    /// Next settled query, or `None` when the input closed or the pipeline
    /// was cancelled.
    pub async fn next(&mut self) -> Option<String> {
        loop {
            let value = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return None,
                value = self.buffer.pop() => value?,
            };

            if self.last_emitted.as_deref() == Some(value.as_str()) {
                tracing::trace!("Skipping repeated query {:?}", value);
                continue;
            }

            self.last_emitted = Some(value.clone());
            return Some(value);
        }
    }
}

/// Timer state machine: one pending value, one resettable deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    settings: DebounceSettings,
}

impl Debouncer {
    pub fn new(settings: DebounceSettings) -> Self {
        Self { settings }
    }

    /// Spawn the pipeline on `runtime`. It ends when the input is dropped
    /// or `cancel` fires.
    pub fn start(
        &self,
        runtime: &Handle,
        cancel: CancellationToken,
    ) -> (QueryInput, DebouncedQueries) {
        let (tx, rx) = mpsc::unbounded_channel();
        let buffer = Arc::new(DropOldestBuffer::new(self.settings.buffer_capacity));

        runtime.spawn(run_timer(
            rx,
            buffer.clone(),
            self.settings.quiet_period,
            cancel.clone(),
        ));

        (
            QueryInput { tx },
            DebouncedQueries {
                buffer,
                cancel,
                last_emitted: None,
            },
        )
    }
}

async fn run_timer(
    mut rx: mpsc::UnboundedReceiver<String>,
    buffer: Arc<DropOldestBuffer<String>>,
    quiet: Duration,
    cancel: CancellationToken,
) {
    let mut pending: Option<String> = None;
    let deadline = tokio::time::sleep(quiet);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Search pipeline cancelled");
                break;
            }
            edit = rx.recv() => match edit {
                Some(text) => {
                    pending = Some(text);
                    deadline.as_mut().reset(Instant::now() + quiet);
                }
                None => {
                    // Input closed: flush without waiting out the quiet period
                    if let Some(value) = pending.take() {
                        buffer.push(value);
                    }
                    break;
                }
            },
            _ = &mut deadline, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    if let Some(dropped) = buffer.push(value) {
                        tracing::trace!("Dropped unconsumed query {:?}", dropped);
                    }
                }
            }
        }
    }

    buffer.close();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DebounceSettings {
        DebounceSettings::default()
    }

    async fn type_with_gaps(input: &QueryInput, edits: &[&str], gap: Duration) {
        for (i, edit) in edits.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(gap).await;
            }
            input.push(*edit);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_settles_to_last_edit() {
        let start = Instant::now();
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), CancellationToken::new());

        type_with_gaps(&input, &["a", "ab", "abc", "abcd"], Duration::from_millis(100)).await;

        assert_eq!(queries.next().await.as_deref(), Some("abcd"));
        assert!(start.elapsed() >= Duration::from_millis(800));

        drop(input);
        assert_eq!(queries.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_adjacent_equal_values_collapse() {
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), CancellationToken::new());

        input.push("ny");
        assert_eq!(queries.next().await.as_deref(), Some("ny"));

        // Typed ahead and back within the quiet period: settles on "ny" again
        input.push("nyc");
        tokio::time::sleep(Duration::from_millis(100)).await;
        input.push("ny");
        tokio::time::sleep(Duration::from_millis(600)).await;
        input.push("nyj");

        assert_eq!(queries.next().await.as_deref(), Some("nyj"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_distinct_values_all_emit() {
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), CancellationToken::new());

        let mut seen = Vec::new();
        for edit in ["ny", "nyc", "ny"] {
            input.push(edit);
            seen.push(queries.next().await);
        }

        assert_eq!(
            seen,
            vec![Some("ny".to_string()), Some("nyc".to_string()), Some("ny".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_consumer_sees_only_newest() {
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), CancellationToken::new());

        // Each edit settles before the next, consumer never reads
        type_with_gaps(&input, &["n", "ny", "nyc"], Duration::from_millis(600)).await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        drop(input);

        assert_eq!(queries.next().await.as_deref(), Some("nyc"));
        assert_eq!(queries.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_string_is_emitted() {
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), CancellationToken::new());

        input.push("ny");
        assert_eq!(queries.next().await.as_deref(), Some("ny"));
        input.push("");
        assert_eq!(queries.next().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_immediately() {
        let start = Instant::now();
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), CancellationToken::new());

        input.push("hobo");
        drop(input);

        assert_eq!(queries.next().await.as_deref(), Some("hobo"));
        assert!(start.elapsed() < DEFAULT_QUIET_PERIOD);
        assert_eq!(queries.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_ends_sequence() {
        let cancel = CancellationToken::new();
        let (input, mut queries) =
            Debouncer::new(settings()).start(&Handle::current(), cancel.clone());

        input.push("newark");
        cancel.cancel();

        assert_eq!(queries.next().await, None);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(input.is_closed());
        assert!(!input.push("trenton"));
    }

    #[tokio::test]
    async fn test_buffer_drops_oldest_when_full() {
        let buffer = DropOldestBuffer::new(2);
        assert_eq!(buffer.push(1), None);
        assert_eq!(buffer.push(2), None);
        assert_eq!(buffer.push(3), Some(1));
        buffer.close();

        assert_eq!(buffer.pop().await, Some(2));
        assert_eq!(buffer.pop().await, Some(3));
        assert_eq!(buffer.pop().await, None);
    }

    #[test]
    fn test_buffer_capacity_is_at_least_one() {
        let buffer: DropOldestBuffer<u8> = DropOldestBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        assert!(buffer.is_empty());
    }
}
