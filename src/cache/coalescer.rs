//! Range Coalescer
//!
//! Narrows a requested row range to the rows that are genuinely missing.
//! Both edges are pulled inward over rows that are already pending or
//! resolved; what remains is split into maximal runs of absent rows, one
//! fetch per run. A gap is never under-fetched, and no row that another
//! fetch already covers is requested twice.

use crate::cache::range_cache::RangeCache;
use crate::cache::span::RowSpan;

/// Intervals of `requested` that still have to be fetched, in ascending order
///
/// Empty when every requested row is already pending or resolved.
pub fn coalesce<T>(cache: &RangeCache<T>, requested: RowSpan) -> Vec<RowSpan> {
    let mut start = requested.start();
    let mut stop = requested.stop();

    while !cache.is_absent(start) && start < stop {
        start += 1;
    }
    while !cache.is_absent(stop) && stop > start {
        stop -= 1;
    }
    if start == stop && !cache.is_absent(start) {
        return Vec::new();
    }

    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;
    for index in start..=stop {
        match (cache.is_absent(index), run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(first)) => {
                runs.extend(RowSpan::new(first, index - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(first) = run_start {
        runs.extend(RowSpan::new(first, stop));
    }

    runs
}
