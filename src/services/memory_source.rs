//! In-Memory Page Source
//!
//! Serves pages out of a fixed paper list, applying the query's search
//! clauses the way the server does. Used for demos and tests.

use std::sync::Arc;

use crate::constants::{TAG_FIELD, TITLE_FIELD};
use crate::domain::{Page, Paper, QueryKey, SearchClause};
use crate::error::Result;
use crate::services::source::PageSource;

/// Paper source over a shared vector
#[derive(Clone, Debug)]
pub struct MemoryPaperSource {
    papers: Arc<Vec<Paper>>,
}

impl MemoryPaperSource {
    /// Create a new source
    pub fn new(papers: Vec<Paper>) -> Self {
        Self {
            papers: Arc::new(papers),
        }
    }

    /// Create from a shared reference
    pub fn from_arc(papers: Arc<Vec<Paper>>) -> Self {
        Self { papers }
    }

    /// Papers matching every clause of the query, in list order
    pub fn matching(&self, query: &QueryKey) -> Vec<&Paper> {
        let clauses = query.clauses();
        self.papers
            .iter()
            .filter(|paper| clauses.iter().all(|clause| clause_matches(paper, clause)))
            .collect()
    }
}

fn clause_matches(paper: &Paper, clause: &SearchClause) -> bool {
    match clause.field() {
        TITLE_FIELD => paper
            .title
            .to_lowercase()
            .contains(&clause.value().to_lowercase()),
        TAG_FIELD => paper.layer_tags.iter().any(|tag| tag == clause.value()),
        other => {
            tracing::debug!("Ignoring unsupported search field {}", other);
            true
        }
    }
}

impl PageSource for MemoryPaperSource {
    type Item = Paper;

    async fn query(&self, query: &QueryKey, offset: usize, limit: usize) -> Result<Page<Paper>> {
        let matching = self.matching(query);
        let items = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|paper| (*paper).clone())
            .collect();
        Ok(Page::new(items, matching.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaperQuery;

    fn papers() -> Vec<Paper> {
        let mut tagged = Paper::new("2", "Spectral Graph Theory");
        tagged.layer_tags = vec!["reviewed".to_string()];
        vec![
            Paper::new("1", "Graph minors"),
            tagged,
            Paper::new("3", "Sieve methods"),
        ]
    }

    #[tokio::test]
    async fn test_title_search_case_insensitive() {
        let source = MemoryPaperSource::new(papers());
        let key = PaperQuery::new().with_title("GRAPH").key();

        let page = source.query(&key, 0, 10).await.expect("page");
        assert_eq!(page.count, 2);
        let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_tag_filter_and_paging() {
        let source = MemoryPaperSource::new(papers());
        let key = PaperQuery::new().with_tags(["reviewed"]).key();
        assert_eq!(source.count(&key).await.expect("count"), 1);

        let all = PaperQuery::new().key();
        let page = source.query(&all, 1, 5).await.expect("page");
        assert_eq!(page.count, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "2");
    }

    #[tokio::test]
    async fn test_count_only_returns_no_items() {
        let source = MemoryPaperSource::new(papers());
        let page = source.query(&PaperQuery::new().key(), 0, 0).await.expect("page");
        assert!(page.items.is_empty());
        assert_eq!(page.count, 3);
    }
}
