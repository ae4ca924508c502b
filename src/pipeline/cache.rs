use ndarray::Array2;

/// Materialized output of the feature pipeline.
///
/// The cache checkpoint stores the concatenated feature matrix (and the
/// encoded labels, where rows carry them) once, so the trainer and the
/// evaluator re-read the matrix instead of re-running text featurization on
/// every pass over the data.
#[derive(Debug, Clone)]
pub struct FeatureCache {
    features: Array2<f64>,
    labels: Vec<Option<usize>>,
}

impl FeatureCache {
    /// Create a cache from a materialized matrix and per-row label keys
    pub fn new(features: Array2<f64>, labels: Vec<Option<usize>>) -> Self {
        debug_assert_eq!(features.nrows(), labels.len());
        Self { features, labels }
    }

    /// The feature matrix, one row per record
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Label key per row (`None` when the record has no known area)
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Label keys for training; `None` if any row is unlabeled
    pub fn training_labels(&self) -> Option<Vec<usize>> {
        self.labels.iter().copied().collect()
    }

    /// Number of rows
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_training_labels_all_present() {
        let cache = FeatureCache::new(array![[1.0, 0.0], [0.0, 1.0]], vec![Some(0), Some(1)]);
        assert_eq!(cache.training_labels(), Some(vec![0, 1]));
        assert_eq!(cache.n_samples(), 2);
        assert_eq!(cache.n_features(), 2);
    }

    #[test]
    fn test_training_labels_with_gap() {
        let cache = FeatureCache::new(array![[1.0], [2.0]], vec![Some(0), None]);
        assert_eq!(cache.training_labels(), None);
    }
}
