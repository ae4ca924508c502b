use crate::config::FeatureConfig;
use crate::error::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A vocabulary term with its inverse document frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct VocabEntry {
    term: String,
    idf: f64,
}

/// Text featurizer for a single text column.
///
/// Tokenizes into lowercase word n-grams, keeps terms above the minimum
/// document frequency up to the vocabulary cap, and emits an L2-normalized
/// TF-IDF vector. The vocabulary is stored sorted by term so feature indices
/// and the serialized form are reproducible for a fixed input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFeaturizer {
    /// Configuration
    config: FeatureConfig,

    /// Vocabulary sorted by term; a term's feature index is its position
    vocabulary: Vec<VocabEntry>,

    /// Is fitted (vocabulary built)
    is_fitted: bool,
}

impl TextFeaturizer {
    /// Create a new, unfitted featurizer
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            config,
            vocabulary: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the vocabulary on a collection of documents
    pub fn fit<'a>(&mut self, documents: impl Iterator<Item = &'a str>) -> Result<()> {
        let mut term_doc_freq: HashMap<String, usize> = HashMap::new();
        let mut n_docs = 0usize;

        for doc in documents {
            n_docs += 1;
            let terms = self.extract_terms(doc);
            let unique_terms: HashSet<_> = terms.into_iter().collect();
            for term in unique_terms {
                *term_doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if n_docs == 0 {
            return Err(TriageError::Training(
                "cannot fit a featurizer on an empty document collection".to_string(),
            ));
        }

        // Keep the most frequent terms; ties break on the term itself so the
        // selection does not depend on hash iteration order.
        let min_df = self.config.min_doc_freq;
        let mut candidates: Vec<(String, usize)> = term_doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= min_df)
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(self.config.max_vocab_size);

        let n_docs = n_docs as f64;
        let mut vocabulary: Vec<VocabEntry> = candidates
            .into_iter()
            .map(|(term, df)| {
                let idf = (n_docs / (1.0 + df as f64)).ln() + 1.0;
                VocabEntry { term, idf }
            })
            .collect();
        vocabulary.sort_by(|a, b| a.term.cmp(&b.term));

        self.vocabulary = vocabulary;
        self.is_fitted = true;

        Ok(())
    }

    /// Transform one document into its feature vector
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        if !self.is_fitted {
            return Err(TriageError::Training(
                "featurizer must be fitted before transform".to_string(),
            ));
        }

        let mut features = vec![0.0; self.vocabulary.len()];

        let terms = self.extract_terms(document);
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        for term in terms {
            *term_counts.entry(term).or_insert(0) += 1;
        }

        for (term, count) in &term_counts {
            if let Ok(idx) = self
                .vocabulary
                .binary_search_by(|entry| entry.term.as_str().cmp(term.as_str()))
            {
                let tf = *count as f64;
                features[idx] = if self.config.use_tfidf {
                    tf * self.vocabulary[idx].idf
                } else {
                    tf
                };
            }
        }

        l2_normalize(&mut features);

        Ok(features)
    }

    /// Number of output features
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Check if fitted
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Extract lowercase word n-grams from a document
    fn extract_terms(&self, document: &str) -> Vec<String> {
        let text = document.to_lowercase();

        let words: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .filter(|w| !w.is_empty() && w.len() >= self.config.min_token_len)
            .collect();

        let (ngram_min, ngram_max) = self.config.ngram_range;
        let mut terms = Vec::new();

        for n in ngram_min..=ngram_max {
            for window in words.windows(n) {
                terms.push(window.join("_"));
            }
        }

        terms
    }
}

/// Scale a vector to unit L2 norm in place
fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn fitted(docs: &[&str]) -> TextFeaturizer {
        let mut featurizer = TextFeaturizer::new(FeatureConfig::default());
        featurizer.fit(docs.iter().copied()).unwrap();
        featurizer
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let featurizer = fitted(&[
            "database connection timeout",
            "database query slow",
            "broken link in documentation",
        ]);

        assert!(featurizer.is_fitted());
        assert!(featurizer.n_features() > 0);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let featurizer = TextFeaturizer::new(FeatureConfig::default());
        let err = featurizer.transform("anything").unwrap_err();
        assert!(matches!(err, TriageError::Training(_)));
    }

    #[test]
    fn test_transform_is_unit_norm() {
        let featurizer = fitted(&["database connection timeout", "database query slow"]);

        let vector = featurizer.transform("database connection").unwrap();
        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_out_of_vocabulary_is_zero() {
        let featurizer = fitted(&["database connection timeout"]);

        let vector = featurizer.transform("completely unrelated words").unwrap();
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_short_tokens_dropped() {
        let featurizer = fitted(&["db is up", "db is down"]);

        // "db" and "is" are below the minimum token length; only the longer
        // tokens make it into the vocabulary.
        let vector = featurizer.transform("db is").unwrap();
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vocabulary_is_deterministic() {
        let docs = ["alpha beta gamma", "beta gamma delta", "gamma delta alpha"];
        let a = fitted(&docs);
        let b = fitted(&docs);

        assert_eq!(a.vocabulary, b.vocabulary);
    }

    #[test]
    fn test_vocab_cap_respected() {
        let mut config = FeatureConfig::default();
        config.max_vocab_size = 2;
        let mut featurizer = TextFeaturizer::new(config);
        featurizer
            .fit(["one two three four five six seven"].into_iter())
            .unwrap();

        assert_eq!(featurizer.n_features(), 2);
    }

    #[test]
    fn test_empty_collection_fails() {
        let mut featurizer = TextFeaturizer::new(FeatureConfig::default());
        let err = featurizer.fit(std::iter::empty()).unwrap_err();
        assert!(matches!(err, TriageError::Training(_)));
    }
}
