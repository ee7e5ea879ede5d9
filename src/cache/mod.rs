//! Row Cache Layer
//!
//! Synchronous building blocks of the windowed table: the sparse row cache,
//! the range coalescer, the row count tracker and the shared state that ties
//! them to one query.
//!
//! ```text
//!  load_more_rows(start, stop)
//!          │
//!          ▼
//!   coalesce ──► mark_pending ──► fetch ──► apply_results / revert_pending
//!                                               (dropped if generation moved)
//! ```

mod coalescer;
mod count;
mod range_cache;
mod slot;
mod span;
mod state;

pub use coalescer::*;
pub use count::*;
pub use range_cache::*;
pub use slot::*;
pub use span::*;
pub use state::*;
