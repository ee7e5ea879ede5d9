//! Service Layer
//!
//! Everything that talks to the remote paper list or runs asynchronously:
//! the page source seam, its HTTP and in-memory implementations, the fetch
//! executor and the events it emits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     FetchExecutor                         │
//! │  issue() ──► spawn() ──► PageSource::query ──► complete() │
//! │  spawn_count() ──► PageSource::count ──► CountTracker     │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ TableEvent
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Host widget / ViewportLoader              │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod events;
mod fetch;
mod http_source;
mod memory_source;
mod runtime;
mod source;

pub use events::*;
pub use fetch::*;
pub use http_source::*;
pub use memory_source::*;
pub use runtime::*;
pub use source::*;
