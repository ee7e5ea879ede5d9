//! Table State
//!
//! The query, row cache and row count of one table, shared between the
//! widget-facing adapter and the fetch tasks. Every mutation runs as one
//! step under the lock; the lock is never held across an await, so readers
//! never observe a partially written range.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use uuid::Uuid;

use crate::cache::count::CountTracker;
use crate::cache::range_cache::RangeCache;
use crate::cache::slot::Generation;
use crate::cache::span::RowSpan;
use crate::domain::QueryKey;

#[derive(Debug)]
struct InFlight {
    id: Uuid,
    span: RowSpan,
    generation: Generation,
    settled: watch::Sender<bool>,
}

/// Range fetches issued and not yet settled
///
/// A request landing on rows another fetch already claimed subscribes to
/// that fetch instead of issuing its own.
#[derive(Debug, Default)]
pub struct InFlightFetches {
    fetches: Vec<InFlight>,
}

impl InFlightFetches {
    /// Track a fetch claiming `span` under `generation`
    pub fn register(&mut self, id: Uuid, span: RowSpan, generation: Generation) {
        let (settled, _) = watch::channel(false);
        self.fetches.push(InFlight {
            id,
            span,
            generation,
            settled,
        });
    }

    /// Settlement signals of the fetches overlapping `span` under `generation`
    pub fn overlapping(&self, span: RowSpan, generation: Generation) -> Vec<watch::Receiver<bool>> {
        self.fetches
            .iter()
            .filter(|fetch| fetch.generation == generation && fetch.span.overlaps(&span))
            .map(|fetch| fetch.settled.subscribe())
            .collect()
    }

    /// Forget a fetch and wake everyone waiting on it
    pub fn settle(&mut self, id: Uuid) {
        if let Some(position) = self.fetches.iter().position(|fetch| fetch.id == id) {
            let fetch = self.fetches.swap_remove(position);
            fetch.settled.send_replace(true);
        }
    }

    /// Forget every fetch; dropping the senders releases all waiters
    pub fn clear(&mut self) {
        self.fetches.clear();
    }

    /// Number of unsettled fetches
    pub fn len(&self) -> usize {
        self.fetches.len()
    }

    /// Check if nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.fetches.is_empty()
    }
}

/// Mutable state behind one table
#[derive(Debug)]
pub struct TableState<T> {
    /// Active query
    pub query: QueryKey,
    /// Rows of the active query
    pub cache: RangeCache<T>,
    /// Range fetches of the current generation still running
    pub in_flight: InFlightFetches,
    /// Total row count of the active query
    pub count: CountTracker,
    /// False once the widget unmounted
    pub mounted: bool,
}

impl<T> TableState<T> {
    /// Fresh state for a query
    pub fn new(query: QueryKey) -> Self {
        Self {
            query,
            cache: RangeCache::new(),
            in_flight: InFlightFetches::default(),
            count: CountTracker::new(),
            mounted: true,
        }
    }

    /// Drop every row and start a new generation
    pub fn reset_rows(&mut self) {
        self.cache.reset();
        self.in_flight.clear();
    }
}

/// Cloneable handle to a table's state
#[derive(Debug)]
pub struct SharedState<T> {
    inner: Arc<Mutex<TableState<T>>>,
}

impl<T> SharedState<T> {
    /// Wrap fresh state for a query
    pub fn new(query: QueryKey) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TableState::new(query))),
        }
    }

    /// Run one atomic step against the state
    pub fn with<R>(&self, step: impl FnOnce(&mut TableState<T>) -> R) -> R {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        step(&mut state)
    }
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, stop: usize) -> RowSpan {
        RowSpan::new(start, stop).expect("span")
    }

    #[test]
    fn test_overlapping_filters_span_and_generation() {
        let mut fetches = InFlightFetches::default();
        let current = Generation::default();
        fetches.register(Uuid::now_v7(), span(0, 9), current);
        fetches.register(Uuid::now_v7(), span(20, 29), current);
        fetches.register(Uuid::now_v7(), span(5, 9), current.next());

        assert_eq!(fetches.overlapping(span(8, 12), current).len(), 1);
        assert!(fetches.overlapping(span(10, 19), current).is_empty());
    }

    #[test]
    fn test_settle_wakes_subscribers() {
        let mut fetches = InFlightFetches::default();
        let id = Uuid::now_v7();
        fetches.register(id, span(0, 9), Generation::default());
        let waiting = fetches.overlapping(span(0, 0), Generation::default());

        fetches.settle(id);
        assert!(fetches.is_empty());
        assert!(waiting.iter().all(|settled| *settled.borrow()));
    }

    #[test]
    fn test_reset_rows_releases_waiters() {
        let mut state: TableState<()> = TableState::new(QueryKey::default());
        let generation = state.cache.generation();
        state.in_flight.register(Uuid::now_v7(), span(0, 4), generation);
        let waiting = state.in_flight.overlapping(span(0, 4), generation);

        state.reset_rows();
        assert!(state.in_flight.is_empty());
        assert_ne!(state.cache.generation(), generation);
        assert!(waiting.iter().all(|settled| settled.has_changed().is_err()));
    }
}
