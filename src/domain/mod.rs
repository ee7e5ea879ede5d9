//! Domain - Pure Data Structures
//!
//! These types don't depend on the runtime and describe the paper list.

pub mod page;
pub mod paper;
pub mod query;

pub use page::{Page, PaperPage};
pub use paper::{ClassStatus, Paper};
pub use query::{PaperQuery, QueryKey, SearchClause};
