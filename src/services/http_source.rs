//! HTTP Page Source
//!
//! Reads the paper list from the TKB server:
//! `GET {server_url}/papers/?q={"search": [...], "offset": o, "limit": l}`
//! answering `{"papers": [...], "count": n}`.

use std::time::Duration;

use crate::config::TableConfig;
use crate::domain::{Page, Paper, PaperPage, QueryKey};
use crate::error::{Error, Result};
use crate::services::source::PageSource;

/// Paper list source backed by the TKB HTTP API
#[derive(Clone, Debug)]
pub struct HttpPaperSource {
    client: reqwest::Client,
    papers_url: String,
}

impl HttpPaperSource {
    /// Create a source for the configured server
    pub fn new(config: &TableConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.page_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            papers_url: papers_url(&config.server_url),
        })
    }

    /// URL of the paper list endpoint
    pub fn papers_url(&self) -> &str {
        &self.papers_url
    }
}

fn papers_url(server_url: &str) -> String {
    format!("{}/papers/", server_url.trim_end_matches('/'))
}

impl PageSource for HttpPaperSource {
    type Item = Paper;

    async fn query(&self, query: &QueryKey, offset: usize, limit: usize) -> Result<Page<Paper>> {
        let q = serde_json::to_string(&query.with_paging(offset, limit))?;
        tracing::debug!("GET {} q={}", self.papers_url, q);

        let response = self
            .client
            .get(&self.papers_url)
            .query(&[("q", q)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.papers_url.clone(),
            });
        }

        let page: PaperPage = response.json().await?;
        Ok(page.into())
    }
}
