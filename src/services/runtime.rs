//! Tokio Runtime Bridge
//!
//! Fetches run as tokio tasks. Hosts that already live inside a runtime pass
//! `Handle::current()`; everything else (the demo binary, synchronous UI
//! loops) uses the global runtime provided here.
//!
//! ## Pattern
//!
//! ```text
//! host thread
//!       │
//!       ▼
//! runtime_handle() ──► VirtualizationAdapter::new(.., handle)
//!       │
//!       ▼
//! block_on(adapter.load_more_rows(..))
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create tokio runtime"))
}

/// Block on a future synchronously
///
/// **Warning**: This blocks the current thread. Never call it from inside
/// the runtime's own worker threads.
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    get_runtime().block_on(future)
}

/// Get a handle to the global tokio runtime
pub fn runtime_handle() -> tokio::runtime::Handle {
    get_runtime().handle().clone()
}
