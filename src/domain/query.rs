//! Query - Search/Filter State and its Comparable Key
//!
//! The table only needs a comparable, serializable value for the active
//! search. `QueryKey` wraps the serialized query object; paging fields never
//! take part in equality and are added only when a request is built.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{TAG_FIELD, TITLE_FIELD};
use crate::error::{Error, Result};

const OFFSET_KEY: &str = "offset";
const LIMIT_KEY: &str = "limit";
const SEARCH_KEY: &str = "search";

/// A structured filter clause, serialized as `[field, value]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchClause(pub String, pub String);

impl SearchClause {
    /// Create a clause
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self(field.into(), value.into())
    }

    /// Field path, e.g. `Paper.title`
    pub fn field(&self) -> &str {
        &self.0
    }

    /// Value to match
    pub fn value(&self) -> &str {
        &self.1
    }
}

/// Opaque comparable key for the active query
///
/// Two keys are equal iff they would produce the same ordered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    object: Arc<Map<String, Value>>,
}

impl QueryKey {
    /// Build a key from a serialized query object
    ///
    /// `offset` and `limit` are stripped so they never affect equality.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(mut object) => {
                object.remove(OFFSET_KEY);
                object.remove(LIMIT_KEY);
                Ok(Self {
                    object: Arc::new(object),
                })
            }
            other => Err(Error::Invalid {
                message: format!("query must be a JSON object, got {other}"),
            }),
        }
    }

    /// Build a key from any serializable query
    pub fn from_query<Q: Serialize>(query: &Q) -> Result<Self> {
        Self::from_value(serde_json::to_value(query)?)
    }

    /// The serialized query object
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.object
    }

    /// The request object for one page: the query plus `offset`/`limit`
    pub fn with_paging(&self, offset: usize, limit: usize) -> Value {
        let mut object = (*self.object).clone();
        object.insert(OFFSET_KEY.to_string(), Value::from(offset));
        object.insert(LIMIT_KEY.to_string(), Value::from(limit));
        Value::Object(object)
    }

    /// The search clauses carried by the key; malformed entries are skipped
    pub fn clauses(&self) -> Vec<SearchClause> {
        let Some(Value::Array(entries)) = self.object.get(SEARCH_KEY) else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect()
    }
}

impl Default for QueryKey {
    fn default() -> Self {
        Self {
            object: Arc::new(Map::new()),
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Value::Object((*self.object).clone()))
    }
}

/// Paper search state: free-text title search plus layer tag filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperQuery {
    title: Option<String>,
    tags: Vec<String>,
}

impl PaperQuery {
    /// Empty query (matches every paper)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title search; an empty string clears it
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.title = (!text.is_empty()).then_some(text);
        self
    }

    /// Replace the tag filters
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Clauses in request order: tag filters first, then the title search
    pub fn clauses(&self) -> Vec<SearchClause> {
        let mut clauses: Vec<SearchClause> = self
            .tags
            .iter()
            .map(|tag| SearchClause::new(TAG_FIELD, tag.as_str()))
            .collect();

        if let Some(title) = &self.title {
            clauses.push(SearchClause::new(TITLE_FIELD, title.as_str()));
        }

        clauses
    }

    /// The comparable key for this query
    pub fn key(&self) -> QueryKey {
        let search = self
            .clauses()
            .into_iter()
            .map(|SearchClause(field, value)| Value::Array(vec![field.into(), value.into()]))
            .collect();

        let mut object = Map::new();
        object.insert(SEARCH_KEY.to_string(), Value::Array(search));
        QueryKey {
            object: Arc::new(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paging_is_not_part_of_key() {
        let a = QueryKey::from_value(json!({"search": [], "offset": 10, "limit": 5}))
            .expect("key");
        let b = QueryKey::from_value(json!({"search": []})).expect("key");
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_object_query_rejected() {
        assert!(QueryKey::from_value(json!(["search"])).is_err());
    }

    #[test]
    fn test_with_paging() {
        let key = PaperQuery::new().with_title("graph").key();
        assert_eq!(
            key.with_paging(25, 50),
            json!({"search": [["Paper.title", "graph"]], "offset": 25, "limit": 50})
        );
    }

    #[test]
    fn test_paper_query_clause_order() {
        let query = PaperQuery::new().with_title("ramsey").with_tags(["t1", "t2"]);
        assert_eq!(
            query.clauses(),
            vec![
                SearchClause::new(TAG_FIELD, "t1"),
                SearchClause::new(TAG_FIELD, "t2"),
                SearchClause::new(TITLE_FIELD, "ramsey"),
            ]
        );
        assert_eq!(query.key().clauses(), query.clauses());
    }

    #[test]
    fn test_empty_title_is_no_search() {
        assert_eq!(PaperQuery::new().with_title("").key(), PaperQuery::new().key());
        assert_ne!(
            PaperQuery::new().with_title("a").key(),
            PaperQuery::new().with_title("b").key()
        );
    }

    #[test]
    fn test_from_query_serializable() {
        #[derive(Serialize)]
        struct Raw {
            search: Vec<SearchClause>,
        }

        let raw = Raw {
            search: vec![SearchClause::new(TITLE_FIELD, "x")],
        };
        let key = QueryKey::from_query(&raw).expect("key");
        assert_eq!(key, PaperQuery::new().with_title("x").key());
    }
}
