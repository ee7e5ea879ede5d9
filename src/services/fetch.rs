//! Fetch Executor
//!
//! Issues one remote query per coalesced span and writes the outcome back
//! into the shared table state. Issuing is synchronous: rows are marked
//! pending before the network call starts, so overlapping requests made
//! while it is in flight coalesce instead of duplicating. Completion order
//! does not matter; every page is applied by absolute index and only if the
//! generation it was issued under is still current.

use std::sync::Arc;

use crossbeam_channel::Sender;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::cache::{coalesce, ApplyOutcome, Generation, RangeCache, RowSpan, SharedState};
use crate::domain::{Page, QueryKey};
use crate::error::Result;
use crate::services::events::TableEvent;
use crate::services::source::PageSource;

/// One issued range fetch
#[derive(Clone, Debug)]
pub struct FetchTicket {
    /// Request id for log correlation
    pub id: Uuid,
    /// Rows covered by the fetch
    pub span: RowSpan,
    /// Cache generation the fetch was issued under
    pub generation: Generation,
    /// Query the fetch runs against
    pub query: QueryKey,
}

/// What happened to a completed fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was written; `missing` rows of a short page stay absent
    Applied { resolved: usize, missing: usize },
    /// The fetch failed and its rows are absent again
    Reverted { message: String },
    /// The generation moved on; the outcome was discarded
    Stale,
}

/// Work produced by issuing a requested range
#[derive(Debug, Default)]
pub struct Issued {
    /// Fetches claimed for absent runs, not started yet
    pub tickets: Vec<FetchTicket>,
    /// Settlement signals of earlier fetches overlapping the range
    pub waiting: Vec<watch::Receiver<bool>>,
}

impl Issued {
    /// Check if the range needs neither a fetch nor a wait
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty() && self.waiting.is_empty()
    }
}

/// Settle a completed fetch against the live cache
pub fn complete<T>(
    cache: &mut RangeCache<T>,
    ticket: &FetchTicket,
    result: Result<Page<T>>,
) -> FetchOutcome {
    match result {
        Ok(page) => match cache.apply_results(ticket.generation, ticket.span, page.items) {
            ApplyOutcome::Applied { resolved, missing } => FetchOutcome::Applied { resolved, missing },
            ApplyOutcome::Stale => FetchOutcome::Stale,
        },
        Err(e) => {
            if cache.revert_pending(ticket.generation, ticket.span) {
                FetchOutcome::Reverted {
                    message: e.to_string(),
                }
            } else {
                FetchOutcome::Stale
            }
        }
    }
}

/// Runs range and count queries against a page source
pub struct FetchExecutor<S: PageSource> {
    source: Arc<S>,
    state: SharedState<S::Item>,
    tx: Sender<TableEvent>,
    handle: Handle,
}

impl<S: PageSource> FetchExecutor<S> {
    /// Create an executor spawning its tasks on `handle`
    pub fn new(
        source: Arc<S>,
        state: SharedState<S::Item>,
        tx: Sender<TableEvent>,
        handle: Handle,
    ) -> Self {
        Self {
            source,
            state,
            tx,
            handle,
        }
    }

    // ==================== Range Fetches ====================

    /// Coalesce a requested range and mark the missing runs pending
    ///
    /// Coalescing, marking and collecting the fetches already running over
    /// the range happen in one step, so two calls can never both claim the
    /// same absent row and a caller always learns who owns a pending row.
    /// The range is clipped to the known row count, so an unresolved count
    /// issues nothing. Returns nothing once unmounted.
    pub fn issue(&self, requested: RowSpan) -> Issued {
        self.state.with(|state| {
            if !state.mounted {
                return Issued::default();
            }
            let Some(requested) = requested.clamp_to(state.count.row_count()) else {
                return Issued::default();
            };

            let generation = state.cache.generation();
            let waiting = state.in_flight.overlapping(requested, generation);
            let tickets = coalesce(&state.cache, requested)
                .into_iter()
                .map(|span| {
                    let id = Uuid::now_v7();
                    state.cache.mark_pending(span);
                    state.in_flight.register(id, span, generation);
                    FetchTicket {
                        id,
                        span,
                        generation,
                        query: state.query.clone(),
                    }
                })
                .collect();

            Issued { tickets, waiting }
        })
    }

    /// Run an issued fetch as a tokio task
    pub fn spawn(&self, ticket: FetchTicket) -> JoinHandle<FetchOutcome> {
        let source = self.source.clone();
        let state = self.state.clone();
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let (offset, limit) = ticket.span.offset_limit();
            tracing::debug!(
                "Starting fetch {} for {} ({}) offset={} limit={}",
                ticket.id,
                ticket.span,
                ticket.generation,
                offset,
                limit
            );

            let result = source.query(&ticket.query, offset, limit).await;
            let outcome = state.with(|state| {
                let outcome = complete(&mut state.cache, &ticket, result);
                state.in_flight.settle(ticket.id);
                outcome
            });
            report(&tx, &ticket, &outcome);
            outcome
        })
    }

    // ==================== Count Queries ====================

    /// Run the count-only query for `generation` as a tokio task
    pub fn spawn_count(&self, generation: Generation, query: QueryKey) -> JoinHandle<()> {
        let source = self.source.clone();
        let state = self.state.clone();
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            tracing::debug!("Starting count query ({}) for {}", generation, query);

            match source.count(&query).await {
                Ok(count) => {
                    if state.with(|state| state.count.resolve(generation, count)) {
                        tracing::info!("Row count resolved ({}): {}", generation, count);
                        let _ = tx.send(TableEvent::CountResolved { generation, count });
                    } else {
                        tracing::debug!("Discarding stale count ({})", generation);
                    }
                }
                Err(e) => {
                    if state.with(|state| state.count.fail(generation)) {
                        tracing::warn!("Count query failed ({}): {}", generation, e);
                        let _ = tx.send(TableEvent::CountFailed {
                            generation,
                            message: e.to_string().into(),
                        });
                    } else {
                        tracing::debug!("Discarding stale count error ({}): {}", generation, e);
                    }
                }
            }
        })
    }
}

fn report(tx: &Sender<TableEvent>, ticket: &FetchTicket, outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Applied { resolved, missing } => {
            if *missing > 0 {
                tracing::warn!(
                    "Fetch {} for {} returned {} of {} rows",
                    ticket.id,
                    ticket.span,
                    resolved,
                    ticket.span.len()
                );
            } else {
                tracing::debug!("Fetch {} for {} applied", ticket.id, ticket.span);
            }
            let _ = tx.send(TableEvent::RowsLoaded {
                span: ticket.span,
                resolved: *resolved,
            });
        }
        FetchOutcome::Reverted { message } => {
            tracing::warn!("Fetch {} for {} failed: {}", ticket.id, ticket.span, message);
            let _ = tx.send(TableEvent::RowsFailed {
                span: ticket.span,
                message: message.as_str().into(),
            });
        }
        FetchOutcome::Stale => {
            tracing::debug!(
                "Discarding stale fetch {} for {} ({})",
                ticket.id,
                ticket.span,
                ticket.generation
            );
        }
    }
}

impl<S: PageSource> std::fmt::Debug for FetchExecutor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchExecutor").finish_non_exhaustive()
    }
}
