//! Paper - Paper List Row Data

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::Placeholder;
use crate::constants::PLACEHOLDER_ID;

/// Extraction status of one annotation class for a paper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStatus {
    /// Number of annotations of this class
    pub count: u32,
    /// Whether the annotations are used as training data
    pub training: bool,
}

impl ClassStatus {
    /// Label rendered in the class status column
    pub fn cell_label(&self) -> String {
        if self.count == 0 {
            "x".to_string()
        } else if self.training {
            "✓".to_string()
        } else {
            self.count.to_string()
        }
    }
}

/// A paper row as returned by the paper list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Resource id
    pub id: String,
    /// Paper title
    #[serde(default)]
    pub title: String,
    /// PDF location
    #[serde(default)]
    pub pdf: String,
    /// Per-class annotation status, keyed by class id
    #[serde(default)]
    pub class_status: BTreeMap<String, ClassStatus>,
    /// Tags of the paper's annotation layers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layer_tags: Vec<String>,
}

impl Paper {
    /// Create a paper with an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Whether this is the placeholder shown while a row loads
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }

    /// Status cell label for a class, ".." when the class is unknown
    pub fn class_cell(&self, class_id: &str) -> String {
        self.class_status
            .get(class_id)
            .map(ClassStatus::cell_label)
            .unwrap_or_else(|| "..".to_string())
    }
}

impl Placeholder for Paper {
    fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_ID.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_status_labels() {
        let none = ClassStatus { count: 0, training: true };
        let training = ClassStatus { count: 4, training: true };
        let counted = ClassStatus { count: 7, training: false };

        assert_eq!(none.cell_label(), "x");
        assert_eq!(training.cell_label(), "✓");
        assert_eq!(counted.cell_label(), "7");
    }

    #[test]
    fn test_paper_deserialize_camel_case() {
        let paper: Paper = serde_json::from_str(
            r#"{"id":"1703.00001","title":"On graphs","pdf":"/p.pdf",
                "classStatus":{"theorem":{"count":2,"training":false}}}"#,
        )
        .expect("paper");

        assert_eq!(paper.id, "1703.00001");
        assert_eq!(paper.class_cell("theorem"), "2");
        assert_eq!(paper.class_cell("proof"), "..");
        assert!(paper.layer_tags.is_empty());
    }

    #[test]
    fn test_placeholder() {
        let placeholder = Paper::placeholder();
        assert!(placeholder.is_placeholder());
        assert!(!Paper::new("1", "t").is_placeholder());
    }
}
