//! Paper Table
//!
//! The widget-facing layer: the provider contract, the virtualization
//! adapter implementing it, and the viewport loader driving it.

pub mod adapter;
pub mod provider;
pub mod viewport;

pub use adapter::VirtualizationAdapter;
pub use provider::{LoadMoreRows, PagedDataProvider};
pub use viewport::{scan_unloaded_ranges, ViewportLoader};
