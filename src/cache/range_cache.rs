//! Range Cache
//!
//! Sparse mapping from row index to row slot. Only pending and resolved rows
//! occupy an entry; a missing entry means the row is absent. All transitions
//! are synchronous and operate on the live map.

use std::sync::Arc;

use ahash::AHashMap;

use crate::cache::slot::{Generation, RowSlot};
use crate::cache::span::RowSpan;

/// Stored state of a non-absent row
#[derive(Debug)]
enum Entry<T> {
    Pending,
    Resolved(Arc<T>),
}

/// Result of applying a page to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page belongs to an older generation and was dropped
    Stale,
    /// Rows were written
    Applied {
        /// Rows now resolved
        resolved: usize,
        /// Rows of the span the page did not cover; reverted to absent
        missing: usize,
    },
}

/// Windowed row cache for the current query
#[derive(Debug)]
pub struct RangeCache<T> {
    entries: AHashMap<usize, Entry<T>>,
    generation: Generation,
}

impl<T> RangeCache<T> {
    /// Create an empty cache at the initial generation
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
            generation: Generation::default(),
        }
    }

    // ==================== Reads ====================

    /// Slot of a row; `Absent` for unknown indices
    pub fn get(&self, index: usize) -> RowSlot<Arc<T>> {
        match self.entries.get(&index) {
            None => RowSlot::Absent,
            Some(Entry::Pending) => RowSlot::Pending,
            Some(Entry::Resolved(item)) => RowSlot::Resolved(item.clone()),
        }
    }

    /// Whether the row is neither pending nor resolved
    pub fn is_absent(&self, index: usize) -> bool {
        !self.entries.contains_key(&index)
    }

    /// Whether the row holds data
    pub fn is_resolved(&self, index: usize) -> bool {
        matches!(self.entries.get(&index), Some(Entry::Resolved(_)))
    }

    /// Current generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of non-absent rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if every row is absent
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pending rows
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, Entry::Pending))
            .count()
    }

    /// Number of resolved rows
    pub fn resolved_count(&self) -> usize {
        self.len() - self.pending_count()
    }

    // ==================== Transitions ====================

    /// Mark every row of the span pending unless it is already resolved
    ///
    /// Returns the number of rows that were absent before the call.
    pub fn mark_pending(&mut self, span: RowSpan) -> usize {
        let mut marked = 0;
        for index in span.indices() {
            self.entries.entry(index).or_insert_with(|| {
                marked += 1;
                Entry::Pending
            });
        }
        marked
    }

    /// Write `items[i]` as resolved at `span.start() + i`
    ///
    /// Items past the end of the span are ignored. Pending rows of the span
    /// that the page did not cover revert to absent so they get re-requested.
    pub fn apply_results(
        &mut self,
        generation: Generation,
        span: RowSpan,
        items: Vec<T>,
    ) -> ApplyOutcome {
        if generation != self.generation {
            return ApplyOutcome::Stale;
        }

        let mut resolved = 0;
        for (index, item) in span.indices().zip(items) {
            self.entries.insert(index, Entry::Resolved(Arc::new(item)));
            resolved += 1;
        }

        let missing = span.len() - resolved;
        if missing > 0 {
            let uncovered = RowSpan::new(span.start() + resolved, span.stop());
            if let Some(uncovered) = uncovered {
                self.clear_pending(uncovered);
            }
        }

        ApplyOutcome::Applied { resolved, missing }
    }

    /// Revert the span's pending rows to absent after a failed fetch
    ///
    /// Returns false (and changes nothing) for an outdated generation.
    pub fn revert_pending(&mut self, generation: Generation, span: RowSpan) -> bool {
        if generation != self.generation {
            return false;
        }
        self.clear_pending(span);
        true
    }

    /// Drop every entry and start a new generation
    pub fn reset(&mut self) {
        self.entries.clear();
        self.generation = self.generation.next();
    }

    fn clear_pending(&mut self, span: RowSpan) {
        for index in span.indices() {
            if matches!(self.entries.get(&index), Some(Entry::Pending)) {
                self.entries.remove(&index);
            }
        }
    }
}

impl<T> Default for RangeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
