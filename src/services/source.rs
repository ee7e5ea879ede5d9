//! Page Source
//!
//! Outbound seam to the remote paginated query endpoint.

use std::future::Future;

use crate::domain::{Page, QueryKey};
use crate::error::Result;

/// A remote data source answering `query(filter, offset, limit)`
///
/// `limit = 0` is the count-only form: items are ignored, the count is
/// authoritative.
pub trait PageSource: Send + Sync + 'static {
    /// Row value returned by the source
    type Item: Send + Sync + 'static;

    /// Fetch `limit` items starting at `offset` plus the total count
    fn query(
        &self,
        query: &QueryKey,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Page<Self::Item>>> + Send;

    /// Fetch only the total count
    fn count(&self, query: &QueryKey) -> impl Future<Output = Result<usize>> + Send {
        async move { Ok(self.query(query, 0, 0).await?.count) }
    }
}
