//! PagedDataProvider Trait
//!
//! The contract a virtualized table widget reads rows through.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::cache::RowSpan;

/// Future completing once the fetches for a requested range have settled
pub type LoadMoreRows = BoxFuture<'static, ()>;

/// Paged data provider for lazy loading
pub trait PagedDataProvider: Send + Sync + 'static {
    type Row: Send + Sync + 'static;

    /// Total number of rows (zero while unknown)
    fn row_count(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Whether a row holds data; pending rows are not loaded
    fn is_row_loaded(&self, index: usize) -> bool;

    /// Request the closed range `[start, stop]`
    fn load_more_rows(&self, start: usize, stop: usize) -> LoadMoreRows;

    /// Row data, or a placeholder for rows not loaded yet
    fn row(&self, index: usize) -> Arc<Self::Row>;

    /// Check if every row of a span is loaded
    fn is_range_loaded(&self, span: RowSpan) -> bool {
        span.indices().all(|index| self.is_row_loaded(index))
    }
}
