//! RowSpan - Closed Interval of Row Indices

use std::ops::{Range, RangeInclusive};

/// A closed `[start, stop]` interval of row indices; never empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowSpan {
    start: usize,
    stop: usize,
}

impl RowSpan {
    /// Create a span, `None` when `start > stop`
    pub fn new(start: usize, stop: usize) -> Option<Self> {
        (start <= stop).then_some(Self { start, stop })
    }

    /// Span covering a single row
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            stop: index,
        }
    }

    /// Span from a half-open range, `None` when the range is empty
    pub fn from_range(range: Range<usize>) -> Option<Self> {
        if range.is_empty() {
            return None;
        }
        Self::new(range.start, range.end - 1)
    }

    /// First row
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last row (inclusive)
    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Number of rows covered
    pub fn len(&self) -> usize {
        (self.stop - self.start).saturating_add(1)
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies inside the span
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.stop).contains(&index)
    }

    /// Whether the two spans share at least one row
    pub fn overlaps(&self, other: &RowSpan) -> bool {
        self.start <= other.stop && other.start <= self.stop
    }

    /// The part of the span below `row_count`, `None` when nothing is left
    pub fn clamp_to(&self, row_count: usize) -> Option<Self> {
        let last_row = row_count.checked_sub(1)?;
        Self::new(self.start, self.stop.min(last_row))
    }

    /// All covered indices
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.stop
    }

    /// Remote paging parameters: `(offset, limit)`
    pub fn offset_limit(&self) -> (usize, usize) {
        (self.start, self.len())
    }
}

impl std::fmt::Display for RowSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.stop)
    }
}
