use crate::config::{FeatureConfig, TrainerConfig};
use crate::data::record::IssueDataset;
use crate::error::{Result, TriageError};
use crate::model::classifier::LinearClassifier;
use crate::model::{ModelMetadata, TriageModel};
use crate::pipeline::{FeaturePipeline, PipelineDescriptor};
use std::collections::BTreeMap;
use tracing::info;

/// Fits the training pipeline against a dataset.
///
/// Takes the fixed feature pipeline, appends the multiclass classification
/// step and the label-decoding step, and fits the whole chain: label
/// vocabulary and featurizers first, then the classifier over the
/// materialized feature matrix. Fitting is synchronous and blocking.
#[derive(Debug, Clone)]
pub struct Trainer {
    features: FeatureConfig,
    params: TrainerConfig,
    seed: u64,
}

impl Trainer {
    /// Create a trainer with the given configuration
    pub fn new(features: FeatureConfig, params: TrainerConfig, seed: u64) -> Self {
        Self {
            features,
            params,
            seed,
        }
    }

    /// Append the classification and label-decoding steps to the feature
    /// pipeline and fit the whole chain, producing a trained model
    pub fn fit(
        &self,
        descriptor: PipelineDescriptor,
        dataset: &IssueDataset,
    ) -> Result<TriageModel> {
        let full_descriptor = descriptor.clone().with_training_steps();

        info!("Training on {} issues", dataset.len());

        let pipeline = FeaturePipeline::fit(descriptor, &self.features, dataset)?;
        let cache = pipeline.materialize(dataset)?;

        let labels = cache.training_labels().ok_or_else(|| {
            TriageError::Training("training dataset contains a row without an area label".to_string())
        })?;

        let n_classes = pipeline.label_vocab().len();
        let classifier =
            LinearClassifier::fit(cache.features(), &labels, n_classes, &self.params)?;

        let mut hyperparameters = BTreeMap::new();
        hyperparameters.insert("alpha".to_string(), self.params.alpha.to_string());

        let metadata = ModelMetadata {
            trainer: "multinomial logistic regression".to_string(),
            n_training_samples: cache.n_samples(),
            n_features: cache.n_features(),
            n_classes,
            seed: self.seed,
            hyperparameters,
        };

        info!(
            "Trained {} over {} features and {} areas",
            metadata.trainer, metadata.n_features, metadata.n_classes
        );

        Ok(TriageModel::new(full_descriptor, pipeline, classifier, metadata))
    }
}
