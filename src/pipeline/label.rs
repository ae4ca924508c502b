use serde::{Deserialize, Serialize};

/// Vocabulary mapping area names to categorical keys and back.
///
/// Keys are assigned in first-occurrence order over the training labels, so
/// a fixed input file always produces the same encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVocabulary {
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Build the vocabulary from training labels
    pub fn fit<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        let mut seen = Vec::new();
        for label in labels {
            if !seen.iter().any(|s: &String| s == label) {
                seen.push(label.to_string());
            }
        }
        Self { labels: seen }
    }

    /// Encode an area name to its key
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|s| s == label)
    }

    /// Decode a key back to its area name
    pub fn decode(&self, key: usize) -> Option<&str> {
        self.labels.get(key).map(|s| s.as_str())
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The label names in key order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
