//! Count Tracker
//!
//! Total row count for the current query, as answered by the count-only
//! query. Until it resolves the table reports zero rows.

use crate::cache::slot::Generation;

/// Known state of the total row count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowCount {
    /// No count query has been issued
    #[default]
    Unknown,
    /// A count query for the generation is in flight
    Loading(Generation),
    /// A refresh for the generation is in flight; the last count still holds
    Reloading(Generation, usize),
    /// The count resolved
    Known(usize),
    /// The count query failed; treated as zero until refreshed
    Failed,
}

/// Tracks the row count of the current query generation
#[derive(Debug, Clone, Default)]
pub struct CountTracker {
    state: RowCount,
}

impl CountTracker {
    /// Create an unarmed tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a count for `generation`; the previous value is dropped
    pub fn arm(&mut self, generation: Generation) {
        self.state = RowCount::Loading(generation);
    }

    /// Expect a fresh count for `generation`, keeping a known count until
    /// it arrives
    pub fn rearm(&mut self, generation: Generation) {
        self.state = match self.state {
            RowCount::Known(count) | RowCount::Reloading(_, count) => {
                RowCount::Reloading(generation, count)
            }
            _ => RowCount::Loading(generation),
        };
    }

    fn is_armed(&self, generation: Generation) -> bool {
        match self.state {
            RowCount::Loading(armed) | RowCount::Reloading(armed, _) => armed == generation,
            _ => false,
        }
    }

    /// Store the count if it answers the armed generation
    pub fn resolve(&mut self, generation: Generation, count: usize) -> bool {
        if !self.is_armed(generation) {
            return false;
        }
        self.state = RowCount::Known(count);
        true
    }

    /// Record a failed count query for the armed generation
    pub fn fail(&mut self, generation: Generation) -> bool {
        if !self.is_armed(generation) {
            return false;
        }
        self.state = RowCount::Failed;
        true
    }

    /// Forget the count
    pub fn clear(&mut self) {
        self.state = RowCount::Unknown;
    }

    /// Current state
    pub fn state(&self) -> RowCount {
        self.state
    }

    /// Row count for the widget: the last known count, otherwise zero
    pub fn row_count(&self) -> usize {
        match self.state {
            RowCount::Known(count) | RowCount::Reloading(_, count) => count,
            _ => 0,
        }
    }
}
