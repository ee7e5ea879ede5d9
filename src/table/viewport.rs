//! Viewport Loader
//!
//! Widget-side bookkeeping in front of a [`PagedDataProvider`]: turns the
//! rendered row window into load requests. Rows within `threshold` of the
//! window are scanned for unloaded runs, short runs are grown towards
//! `minimum_batch_size`, and a render producing the same runs as the last
//! one requests nothing. That memory must be dropped whenever the provider
//! discards its rows, and the last rendered window reloaded, otherwise the
//! widget never asks for them again.

use futures::FutureExt;

use crate::cache::RowSpan;
use crate::config::TableConfig;
use crate::constants::{DEFAULT_MINIMUM_BATCH_SIZE, DEFAULT_THRESHOLD};
use crate::services::TableEvent;
use crate::table::provider::{LoadMoreRows, PagedDataProvider};

/// Unloaded runs of `[start, stop]`, each grown to `minimum_batch_size`
/// where neighbouring rows are unloaded too
pub fn scan_unloaded_ranges(
    is_row_loaded: impl Fn(usize) -> bool,
    row_count: usize,
    start: usize,
    stop: usize,
    minimum_batch_size: usize,
) -> Vec<RowSpan> {
    if row_count == 0 || start > stop || start >= row_count {
        return Vec::new();
    }
    let last_row = row_count - 1;
    let stop = stop.min(last_row);
    let batch = minimum_batch_size.max(1);

    let mut ranges: Vec<RowSpan> = Vec::new();
    let mut open: Option<(usize, usize)> = None;

    for index in start..=stop {
        if !is_row_loaded(index) {
            open = Some(match open {
                Some((first, _)) => (first, index),
                None => (index, index),
            });
        } else if let Some((first, last)) = open.take() {
            ranges.extend(RowSpan::new(first, last));
        }
    }

    // The trailing run may continue past the scanned window
    if let Some((first, mut last)) = open {
        let potential_stop = (first + batch - 1).max(last).min(last_row);
        while last < potential_stop && !is_row_loaded(last + 1) {
            last += 1;
        }
        ranges.extend(RowSpan::new(first, last));
    }

    // A short first run may be filled backwards
    if let Some(first) = ranges.first_mut() {
        let mut begin = first.start();
        while first.stop() - begin + 1 < batch && begin > 0 && !is_row_loaded(begin - 1) {
            begin -= 1;
        }
        if let Some(grown) = RowSpan::new(begin, first.stop()) {
            *first = grown;
        }
    }

    ranges
}

/// Decides which rows to request as the visible window moves
#[derive(Debug, Clone)]
pub struct ViewportLoader {
    threshold: usize,
    minimum_batch_size: usize,
    last_requested: Vec<RowSpan>,
    last_rendered: Option<(usize, usize)>,
}

impl ViewportLoader {
    /// Create a loader with default threshold and batch size
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            minimum_batch_size: DEFAULT_MINIMUM_BATCH_SIZE,
            last_requested: Vec::new(),
            last_rendered: None,
        }
    }

    /// Create a loader from the table configuration
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new()
            .with_threshold(config.threshold)
            .with_minimum_batch_size(config.minimum_batch_size)
    }

    /// Rows scanned beyond each edge of the visible window
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Smallest range worth requesting
    pub fn with_minimum_batch_size(mut self, size: usize) -> Self {
        self.minimum_batch_size = size.max(1);
        self
    }

    /// Ranges requested by the last render that requested anything
    pub fn last_requested(&self) -> &[RowSpan] {
        &self.last_requested
    }

    /// Ranges to request for the rendered rows `[first_visible, last_visible]`
    ///
    /// Empty when nothing is unloaded or when the result equals the last one.
    pub fn on_rows_rendered<P: PagedDataProvider>(
        &mut self,
        provider: &P,
        first_visible: usize,
        last_visible: usize,
    ) -> Vec<RowSpan> {
        self.last_rendered = Some((first_visible, last_visible));
        let ranges = scan_unloaded_ranges(
            |index| provider.is_row_loaded(index),
            provider.row_count(),
            first_visible.saturating_sub(self.threshold),
            last_visible.saturating_add(self.threshold),
            self.minimum_batch_size,
        );

        if ranges.is_empty() || ranges == self.last_requested {
            return Vec::new();
        }
        self.last_requested = ranges.clone();
        ranges
    }

    /// Request every range `on_rows_rendered` yields and wait for all of them
    pub fn load_visible<P: PagedDataProvider>(
        &mut self,
        provider: &P,
        first_visible: usize,
        last_visible: usize,
    ) -> LoadMoreRows {
        let loads: Vec<_> = self
            .on_rows_rendered(provider, first_visible, last_visible)
            .into_iter()
            .map(|span| provider.load_more_rows(span.start(), span.stop()))
            .collect();

        futures::future::join_all(loads).map(|_| ()).boxed()
    }

    /// Rows last passed to `on_rows_rendered`
    pub fn last_rendered(&self) -> Option<(usize, usize)> {
        self.last_rendered
    }

    /// Forget which ranges were requested
    pub fn reset_load_more_rows_cache(&mut self) {
        self.last_requested.clear();
    }

    /// Scan the last rendered window again and load what it is missing
    pub fn reload<P: PagedDataProvider>(&mut self, provider: &P) -> LoadMoreRows {
        match self.last_rendered {
            Some((first_visible, last_visible)) => {
                self.load_visible(provider, first_visible, last_visible)
            }
            None => futures::future::ready(()).boxed(),
        }
    }

    /// React to a table event
    ///
    /// Returns true when the last rendered window should be reloaded: after
    /// the provider dropped its rows and once the new row count is known.
    pub fn handle_event(&mut self, event: &TableEvent) -> bool {
        match event {
            TableEvent::ResetLoadedRanges { generation } => {
                tracing::debug!("Resetting requested ranges ({})", generation);
                self.reset_load_more_rows_cache();
                true
            }
            TableEvent::CountResolved { .. } => true,
            _ => false,
        }
    }
}

impl Default for ViewportLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaperQuery;
    use crate::services::MemoryPaperSource;
    use crate::table::VirtualizationAdapter;
    use crate::test_support::{eventually, paper};
    use std::collections::BTreeSet;
    use tokio::runtime::Handle;

    fn span(start: usize, stop: usize) -> RowSpan {
        RowSpan::new(start, stop).expect("span")
    }

    #[test]
    fn test_scan_empty_table() {
        assert!(scan_unloaded_ranges(|_| false, 0, 0, 10, 25).is_empty());
    }

    #[test]
    fn test_scan_splits_on_loaded_rows() {
        let loaded: BTreeSet<usize> = (3..6).collect();
        let ranges = scan_unloaded_ranges(|i| loaded.contains(&i), 100, 0, 9, 1);
        assert_eq!(ranges, vec![span(0, 2), span(6, 9)]);
    }

    #[test]
    fn test_scan_grows_trailing_run_to_batch() {
        let ranges = scan_unloaded_ranges(|_| false, 100, 0, 4, 25);
        assert_eq!(ranges, vec![span(0, 24)]);

        let clamped = scan_unloaded_ranges(|_| false, 10, 0, 4, 25);
        assert_eq!(clamped, vec![span(0, 9)]);
    }

    #[test]
    fn test_scan_stops_growing_at_loaded_row() {
        let ranges = scan_unloaded_ranges(|i| i == 8, 100, 0, 4, 25);
        assert_eq!(ranges, vec![span(0, 7)]);
    }

    #[test]
    fn test_scan_fills_first_run_backwards() {
        let loaded: BTreeSet<usize> = (0..40).chain(52..100).collect();
        let ranges = scan_unloaded_ranges(|i| loaded.contains(&i), 100, 50, 60, 10);
        assert_eq!(ranges, vec![span(42, 51)]);
    }

    #[tokio::test]
    async fn test_loader_memoizes_until_reset() {
        let papers = (0..200).map(paper).collect();
        let adapter = VirtualizationAdapter::new(
            MemoryPaperSource::new(papers),
            PaperQuery::new().key(),
            Handle::current(),
        );
        adapter.refresh_count().await;
        assert_eq!(adapter.row_count(), 200);

        let mut loader = ViewportLoader::new().with_threshold(5).with_minimum_batch_size(10);
        let first = loader.on_rows_rendered(&adapter, 0, 9);
        assert_eq!(first, vec![span(0, 14)]);

        // Same window while nothing loaded yet: already requested
        assert!(loader.on_rows_rendered(&adapter, 0, 9).is_empty());

        assert!(loader.handle_event(&TableEvent::ResetLoadedRanges {
            generation: Default::default(),
        }));
        assert_eq!(loader.on_rows_rendered(&adapter, 0, 9), first);
    }

    #[tokio::test]
    async fn test_load_visible_resolves_window() {
        let papers = (0..60).map(paper).collect();
        let adapter = VirtualizationAdapter::new(
            MemoryPaperSource::new(papers),
            PaperQuery::new().key(),
            Handle::current(),
        );
        adapter.refresh_count().await;

        let mut loader = ViewportLoader::new().with_threshold(0).with_minimum_batch_size(25);
        loader.load_visible(&adapter, 0, 9).await;

        assert!(adapter.is_range_loaded(span(0, 24)));
        assert!(!adapter.is_row_loaded(25));
        assert_eq!(adapter.row(24).id, paper(24).id);
        assert!(loader.load_visible(&adapter, 0, 9).now_or_never().is_some());
    }

    #[tokio::test]
    async fn test_query_change_reloads_last_window() {
        let papers = (0..40).map(paper).collect();
        let adapter = VirtualizationAdapter::new(
            MemoryPaperSource::new(papers),
            PaperQuery::new().key(),
            Handle::current(),
        );
        let events = adapter.events();
        adapter.refresh_count().await;

        let mut loader = ViewportLoader::new().with_threshold(0).with_minimum_batch_size(10);
        loader.load_visible(&adapter, 0, 9).await;
        assert!(adapter.is_range_loaded(span(0, 9)));

        // Titles containing "#3": rows 3 and 30..=39
        assert!(adapter.set_query(PaperQuery::new().with_title("#3").key()));
        eventually(|| adapter.row_count() == 11).await;

        let mut reload = false;
        for event in events.try_iter() {
            reload |= loader.handle_event(&event);
        }
        assert!(reload);
        assert_eq!(loader.last_rendered(), Some((0, 9)));

        loader.reload(&adapter).await;
        assert!(adapter.is_range_loaded(span(0, 9)));
        assert_eq!(adapter.row(0).id, paper(3).id);
        assert_eq!(adapter.row(1).id, paper(30).id);
    }

    #[tokio::test]
    async fn test_reload_without_render_is_noop() {
        let adapter = VirtualizationAdapter::new(
            MemoryPaperSource::new((0..5).map(paper).collect()),
            PaperQuery::new().key(),
            Handle::current(),
        );
        adapter.refresh_count().await;

        let mut loader = ViewportLoader::new();
        assert!(loader.reload(&adapter).now_or_never().is_some());
        assert!(!adapter.is_row_loaded(0));
    }
}
