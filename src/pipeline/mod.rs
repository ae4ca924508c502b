//! The fixed feature-extraction pipeline: label encoding, per-column text
//! featurization, concatenation and the cache checkpoint.

pub mod cache;
pub mod descriptor;
pub mod featurize;
pub mod label;

pub use cache::FeatureCache;
pub use descriptor::{
    feature_pipeline, PipelineDescriptor, PipelineStep, StepKind, COLUMN_DESCRIPTION_FEATURIZED,
    COLUMN_FEATURES, COLUMN_LABEL, COLUMN_PREDICTED_LABEL, COLUMN_TITLE_FEATURIZED,
};
pub use featurize::TextFeaturizer;
pub use label::LabelVocabulary;

use crate::config::FeatureConfig;
use crate::data::record::{IssueDataset, IssueRecord};
use crate::error::{Result, TriageError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The fitted feature-extraction chain.
///
/// Executes the first five pipeline steps against records: area labels are
/// encoded through the label vocabulary, both text columns run through their
/// own featurizer, and the vectors are concatenated. [`materialize`] is the
/// cache checkpoint: it produces the feature matrix once for downstream
/// passes. The same chain serves training, batch evaluation and single
/// prediction.
///
/// [`materialize`]: FeaturePipeline::materialize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    descriptor: PipelineDescriptor,
    label_vocab: LabelVocabulary,
    title_featurizer: TextFeaturizer,
    description_featurizer: TextFeaturizer,
}

impl FeaturePipeline {
    /// Fit the declared feature-extraction steps against a training dataset
    pub fn fit(
        descriptor: PipelineDescriptor,
        config: &FeatureConfig,
        dataset: &IssueDataset,
    ) -> Result<Self> {
        if dataset.is_empty() {
            return Err(TriageError::Training(
                "cannot fit the feature pipeline on an empty dataset".to_string(),
            ));
        }

        let label_vocab = LabelVocabulary::fit(dataset.areas());
        if label_vocab.is_empty() {
            return Err(TriageError::Training(
                "training dataset carries no area labels".to_string(),
            ));
        }

        let mut title_featurizer = TextFeaturizer::new(config.clone());
        title_featurizer.fit(dataset.iter().map(|r| r.title.as_str()))?;

        let mut description_featurizer = TextFeaturizer::new(config.clone());
        description_featurizer.fit(dataset.iter().map(|r| r.description.as_str()))?;

        info!(
            "Fitted feature pipeline: {} title terms, {} description terms, {} areas",
            title_featurizer.n_features(),
            description_featurizer.n_features(),
            label_vocab.len()
        );

        Ok(Self {
            descriptor,
            label_vocab,
            title_featurizer,
            description_featurizer,
        })
    }

    /// Featurize one record: title and description vectors, concatenated
    pub fn featurize(&self, record: &IssueRecord) -> Result<Vec<f64>> {
        let mut features = self.title_featurizer.transform(&record.title)?;
        features.extend(self.description_featurizer.transform(&record.description)?);
        Ok(features)
    }

    /// Materialize the feature matrix and encoded labels for a dataset.
    ///
    /// This is the cache checkpoint: featurization runs exactly once per
    /// record and downstream passes read the stored matrix.
    pub fn materialize(&self, dataset: &IssueDataset) -> Result<FeatureCache> {
        let n_samples = dataset.len();
        let n_features = self.n_features();

        let mut values = Vec::with_capacity(n_samples * n_features);
        let mut labels = Vec::with_capacity(n_samples);

        for record in dataset.iter() {
            values.extend(self.featurize(record)?);
            labels.push(record.area.as_deref().and_then(|a| self.label_vocab.encode(a)));
        }

        let features = Array2::from_shape_vec((n_samples, n_features), values)
            .map_err(|e| TriageError::Training(format!("failed to build feature matrix: {e}")))?;

        Ok(FeatureCache::new(features, labels))
    }

    /// Total width of the concatenated feature vector
    pub fn n_features(&self) -> usize {
        self.title_featurizer.n_features() + self.description_featurizer.n_features()
    }

    /// The area label vocabulary
    pub fn label_vocab(&self) -> &LabelVocabulary {
        &self.label_vocab
    }

    /// The declarative steps this pipeline executes
    pub fn descriptor(&self) -> &PipelineDescriptor {
        &self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::IssueRecord;

    fn sample_dataset() -> IssueDataset {
        IssueDataset::new(vec![
            IssueRecord::new(
                "Database connection timeout",
                "Connection to the database failed",
                "area-data",
            ),
            IssueRecord::new(
                "Broken documentation link",
                "The getting started page links nowhere",
                "area-docs",
            ),
            IssueRecord::new(
                "Database query slow",
                "Queries against the database take seconds",
                "area-data",
            ),
        ])
    }

    fn fit_pipeline(dataset: &IssueDataset) -> Result<FeaturePipeline> {
        FeaturePipeline::fit(feature_pipeline(), &FeatureConfig::default(), dataset)
    }

    #[test]
    fn test_fit_and_featurize() {
        let pipeline = fit_pipeline(&sample_dataset()).unwrap();

        assert_eq!(pipeline.label_vocab().len(), 2);
        assert!(pipeline.n_features() > 0);

        let record = IssueRecord::unlabeled("Database timeout", "The database is down");
        let features = pipeline.featurize(&record).unwrap();
        assert_eq!(features.len(), pipeline.n_features());
        assert!(features.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_materialize_shapes() {
        let dataset = sample_dataset();
        let pipeline = fit_pipeline(&dataset).unwrap();

        let cache = pipeline.materialize(&dataset).unwrap();
        assert_eq!(cache.n_samples(), 3);
        assert_eq!(cache.n_features(), pipeline.n_features());
        assert_eq!(cache.training_labels(), Some(vec![0, 1, 0]));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = fit_pipeline(&IssueDataset::default()).unwrap_err();
        assert!(matches!(err, TriageError::Training(_)));
    }

    #[test]
    fn test_unknown_area_materializes_as_none() {
        let dataset = sample_dataset();
        let pipeline = fit_pipeline(&dataset).unwrap();

        let held_out = IssueDataset::new(vec![IssueRecord::new(
            "New issue",
            "Something else entirely",
            "area-never-seen",
        )]);

        let cache = pipeline.materialize(&held_out).unwrap();
        assert_eq!(cache.labels(), &[None]);
    }
}
