//! Virtualization Adapter
//!
//! Widget-facing side of the windowed paper table. Reads are synchronous
//! and never fail. A range request spawns one fetch per missing run and
//! waits on whatever fetch already owns its pending rows. A query change
//! clears the cache, re-arms the row count and tells the widget to forget
//! its requested ranges.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::cache::{Placeholder, RowCount, RowSlot, RowSpan, SharedState};
use crate::domain::QueryKey;
use crate::services::{FetchExecutor, Issued, PageSource, TableEvent};
use crate::table::provider::{LoadMoreRows, PagedDataProvider};

/// Windowed row cache and range-fetch coordinator for one table
pub struct VirtualizationAdapter<S: PageSource> {
    /// Query, rows and count
    state: SharedState<S::Item>,
    /// Issues and settles remote queries
    executor: FetchExecutor<S>,
    /// Returned for rows that hold no data
    placeholder: Arc<S::Item>,
    /// Event sender (for internal use)
    tx: Sender<TableEvent>,
    /// Event receiver (for the host widget)
    rx: Receiver<TableEvent>,
}

impl<S> VirtualizationAdapter<S>
where
    S: PageSource,
    S::Item: Placeholder,
{
    /// Create an adapter for `query` and start its count query
    ///
    /// Fetch tasks are spawned on `handle`.
    pub fn new(source: S, query: QueryKey, handle: Handle) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let state = SharedState::new(query);
        let executor = FetchExecutor::new(Arc::new(source), state.clone(), tx.clone(), handle);

        let adapter = Self {
            state,
            executor,
            placeholder: Arc::new(S::Item::placeholder()),
            tx,
            rx,
        };
        adapter.start_count_query();
        adapter
    }
}

impl<S: PageSource> VirtualizationAdapter<S> {
    /// Get the event receiver for the host widget
    pub fn events(&self) -> Receiver<TableEvent> {
        self.rx.clone()
    }

    /// The active query
    pub fn query(&self) -> QueryKey {
        self.state.with(|state| state.query.clone())
    }

    /// State of the total row count
    pub fn count_state(&self) -> RowCount {
        self.state.with(|state| state.count.state())
    }

    /// Slot of a row
    pub fn slot(&self, index: usize) -> RowSlot<Arc<S::Item>> {
        self.state.with(|state| state.cache.get(index))
    }

    // ==================== Query Lifecycle ====================

    /// Switch to a new query
    ///
    /// Returns false when `query` equals the active one and the table is
    /// mounted; otherwise every cached row is discarded, in-flight fetches
    /// are invalidated, the count is re-fetched and the widget is told to
    /// reset its loaded-range memory.
    pub fn set_query(&self, query: QueryKey) -> bool {
        let generation = self.state.with(|state| {
            if state.mounted && state.query == query {
                return None;
            }
            state.query = query.clone();
            state.mounted = true;
            state.reset_rows();
            let generation = state.cache.generation();
            state.count.arm(generation);
            Some(generation)
        });

        let Some(generation) = generation else {
            return false;
        };

        tracing::info!("Query changed ({}): {}", generation, query);
        let _ = self.tx.send(TableEvent::QueryChanged { generation });
        let _ = self.tx.send(TableEvent::ResetLoadedRanges { generation });
        self.executor.spawn_count(generation, query);
        true
    }

    /// Re-issue the count query for the active query
    ///
    /// A known count keeps being reported until the new one arrives.
    /// Returns a future completing once the count settled; a no-op after
    /// unmount.
    pub fn refresh_count(&self) -> LoadMoreRows {
        match self.start_count_query() {
            Some(task) => async move {
                if let Err(e) = task.await {
                    tracing::error!("Count task aborted: {}", e);
                }
            }
            .boxed(),
            None => futures::future::ready(()).boxed(),
        }
    }

    fn start_count_query(&self) -> Option<JoinHandle<()>> {
        let (generation, query) = self.state.with(|state| {
            if !state.mounted {
                return None;
            }
            let generation = state.cache.generation();
            state.count.rearm(generation);
            Some((generation, state.query.clone()))
        })?;

        Some(self.executor.spawn_count(generation, query))
    }

    /// Discard all rows and invalidate every in-flight query
    pub fn unmount(&self) {
        self.state.with(|state| {
            state.mounted = false;
            state.reset_rows();
            state.count.clear();
        });
        tracing::debug!("Table unmounted");
    }
}

impl<S: PageSource> PagedDataProvider for VirtualizationAdapter<S> {
    type Row = S::Item;

    fn row_count(&self) -> usize {
        self.state.with(|state| state.count.row_count())
    }

    fn is_row_loaded(&self, index: usize) -> bool {
        self.state.with(|state| state.cache.is_resolved(index))
    }

    fn load_more_rows(&self, start: usize, stop: usize) -> LoadMoreRows {
        let Some(requested) = RowSpan::new(start, stop) else {
            tracing::debug!("Ignoring inverted range {}..{}", start, stop);
            return futures::future::ready(()).boxed();
        };

        let issued = self.executor.issue(requested);
        if issued.is_empty() {
            tracing::trace!("Range {} needs no fetch", requested);
            return futures::future::ready(()).boxed();
        }

        let Issued { tickets, waiting } = issued;
        let tasks: Vec<_> = tickets
            .into_iter()
            .map(|ticket| self.executor.spawn(ticket))
            .collect();

        // Rows claimed by earlier calls count as satisfied once their fetch settles
        async move {
            for result in futures::future::join_all(tasks).await {
                if let Err(e) = result {
                    tracing::error!("Fetch task aborted: {}", e);
                }
            }
            for mut settled in waiting {
                let _ = settled.wait_for(|done| *done).await;
            }
        }
        .boxed()
    }

    fn row(&self, index: usize) -> Arc<S::Item> {
        match self.slot(index) {
            RowSlot::Resolved(item) => item,
            _ => self.placeholder.clone(),
        }
    }
}

impl<S: PageSource> std::fmt::Debug for VirtualizationAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (query, rows, generation) = self.state.with(|state| {
            (
                state.query.to_string(),
                state.cache.len(),
                state.cache.generation(),
            )
        });
        f.debug_struct("VirtualizationAdapter")
            .field("query", &query)
            .field("rows", &rows)
            .field("generation", &generation)
            .finish()
    }
}
