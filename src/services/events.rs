//! Table Events
//!
//! Notifications emitted by the table core to the host widget. The widget
//! must act on `ResetLoadedRanges`; the rest drive re-rendering and logs.

use std::sync::Arc;

use crate::cache::{Generation, RowSpan};

/// Events emitted by the table core
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    // ==================== Query Lifecycle ====================
    /// The active query changed; the cache was cleared
    QueryChanged {
        /// Generation the new query runs under
        generation: Generation,
    },

    /// The widget must forget which ranges it already requested
    ResetLoadedRanges {
        /// Generation the reset belongs to
        generation: Generation,
    },

    // ==================== Row Count ====================
    /// The count-only query answered
    CountResolved {
        /// Generation of the count query
        generation: Generation,
        /// Total rows of the query
        count: usize,
    },

    /// The count-only query failed; the row count reads as zero
    CountFailed {
        /// Generation of the count query
        generation: Generation,
        /// Error description
        message: Arc<str>,
    },

    // ==================== Rows ====================
    /// A fetched page was written to the cache
    RowsLoaded {
        /// Requested span
        span: RowSpan,
        /// Rows resolved from the page
        resolved: usize,
    },

    /// A range fetch failed; its rows are absent again
    RowsFailed {
        /// Requested span
        span: RowSpan,
        /// Error description
        message: Arc<str>,
    },
}
