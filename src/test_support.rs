//! Test Support
//!
//! A page source whose answers the test releases explicitly, so completion
//! order of concurrent fetches is under test control.

use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::domain::{Page, Paper, QueryKey};
use crate::error::{Error, Result};
use crate::services::PageSource;

/// Paper with a predictable id for a row index
pub(crate) fn paper(index: usize) -> Paper {
    Paper::new(format!("paper-{index}"), format!("Paper #{index}"))
}

/// Page of predictable papers for a row range
pub(crate) fn page(rows: Range<usize>, count: usize) -> Page<Paper> {
    Page::new(rows.map(paper).collect(), count)
}

/// Wait until `condition` holds, yielding to spawned tasks in between
pub(crate) async fn eventually(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition never became true");
}

struct Call {
    query: QueryKey,
    offset: usize,
    limit: usize,
    responder: Option<oneshot::Sender<Result<Page<Paper>>>>,
}

/// Page source answering only when told to
#[derive(Clone, Default)]
pub(crate) struct ScriptedSource {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_calls<R>(&self, f: impl FnOnce(&mut Vec<Call>) -> R) -> R {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut calls)
    }

    /// `(offset, limit)` of every range request so far, count queries excluded
    pub(crate) fn requests(&self) -> Vec<(usize, usize)> {
        self.with_calls(|calls| {
            calls
                .iter()
                .filter(|call| call.limit > 0)
                .map(|call| (call.offset, call.limit))
                .collect()
        })
    }

    /// Queries of every call so far, in arrival order
    pub(crate) fn queries(&self) -> Vec<QueryKey> {
        self.with_calls(|calls| calls.iter().map(|call| call.query.clone()).collect())
    }

    /// Number of calls received, count queries included
    pub(crate) fn call_count(&self) -> usize {
        self.with_calls(|calls| calls.len())
    }

    /// Wait until at least `n` calls arrived
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        eventually(|| self.call_count() >= n).await;
    }

    fn respond_where(&self, matches: impl Fn(&Call) -> bool, result: Result<Page<Paper>>) {
        let responder = self.with_calls(|calls| {
            calls
                .iter_mut()
                .find(|call| call.responder.is_some() && matches(call))
                .and_then(|call| call.responder.take())
        });
        let responder = responder.expect("no open call matches");
        let _ = responder.send(result);
    }

    /// Answer the open range call with this offset and limit
    pub(crate) fn respond_range(&self, offset: usize, limit: usize, result: Result<Page<Paper>>) {
        self.respond_where(|call| call.offset == offset && call.limit == limit, result);
    }

    /// Fail the open range call with this offset and limit
    pub(crate) fn fail_range(&self, offset: usize, limit: usize) {
        self.respond_range(
            offset,
            limit,
            Err(Error::Status {
                status: 503,
                url: "http://localhost:8000/papers/".to_string(),
            }),
        );
    }

    /// Answer the oldest open count query
    pub(crate) fn respond_count(&self, count: usize) {
        self.respond_where(|call| call.limit == 0, Ok(Page::count_only(count)));
    }

    /// Answer the open count query issued for `query`
    pub(crate) fn respond_count_for(&self, query: &QueryKey, count: usize) {
        self.respond_where(
            |call| call.limit == 0 && &call.query == query,
            Ok(Page::count_only(count)),
        );
    }

    /// Fail the oldest open count query
    pub(crate) fn fail_count(&self) {
        self.respond_where(
            |call| call.limit == 0,
            Err(Error::Invalid {
                message: "count unavailable".to_string(),
            }),
        );
    }
}

impl PageSource for ScriptedSource {
    type Item = Paper;

    fn query(
        &self,
        query: &QueryKey,
        offset: usize,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Page<Paper>>> + Send {
        let (tx, rx) = oneshot::channel();
        self.with_calls(|calls| {
            calls.push(Call {
                query: query.clone(),
                offset,
                limit,
                responder: Some(tx),
            })
        });

        async move {
            rx.await.unwrap_or_else(|_| {
                Err(Error::Invalid {
                    message: "call dropped".to_string(),
                })
            })
        }
    }
}
