//! The trained model: transform, single prediction and serialization.

pub mod classifier;
pub mod persist;
pub mod trainer;

pub use classifier::LinearClassifier;
pub use persist::{load_model, save_model};
pub use trainer::Trainer;

use crate::data::record::{IssueDataset, IssueRecord};
use crate::error::{Result, TriageError};
use crate::pipeline::{FeaturePipeline, PipelineDescriptor};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capability interface of a trained model.
///
/// Components downstream of the trainer (persistence, evaluation, single
/// prediction) program against this trait rather than any concrete toolkit
/// type.
pub trait Transformer {
    /// Apply the full transform chain to a dataset, one prediction per row
    fn transform(&self, dataset: &IssueDataset) -> Result<Vec<PredictionResult>>;

    /// Apply the identical transform chain to a single ad-hoc record
    fn predict_single(&self, record: &IssueRecord) -> Result<PredictionResult>;

    /// Serialize the model to bytes
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize a model from bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Prediction for one issue record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted area label
    pub area: String,

    /// Probability of the predicted area
    pub confidence: f64,

    /// Per-class probabilities in label-key order
    pub scores: Vec<(String, f64)>,
}

/// Descriptive metadata captured at training time.
///
/// Deliberately carries no timestamps: the artifact must be bit-identical
/// across runs with the same seed and inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Human-readable trainer name
    pub trainer: String,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Width of the concatenated feature vector
    pub n_features: usize,

    /// Number of area labels
    pub n_classes: usize,

    /// Seed recorded for reproducibility
    pub seed: u64,

    /// Hyperparameters, in stable order
    pub hyperparameters: BTreeMap<String, String>,
}

/// A trained issue-triage model.
///
/// Owns the fitted feature pipeline and the classifier; read-only after
/// creation. The embedded descriptor carries all seven steps, the five
/// feature-extraction steps plus the classifier and label-decoding steps
/// appended by the trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageModel {
    descriptor: PipelineDescriptor,
    pipeline: FeaturePipeline,
    classifier: LinearClassifier,
    metadata: ModelMetadata,
}

impl TriageModel {
    pub(crate) fn new(
        descriptor: PipelineDescriptor,
        pipeline: FeaturePipeline,
        classifier: LinearClassifier,
        metadata: ModelMetadata,
    ) -> Self {
        Self {
            descriptor,
            pipeline,
            classifier,
            metadata,
        }
    }

    /// The full training pipeline descriptor
    pub fn descriptor(&self) -> &PipelineDescriptor {
        &self.descriptor
    }

    /// The fitted feature pipeline
    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    /// Training-time metadata
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Decode classifier output rows into prediction results
    fn decode_proba(&self, proba: &Array2<f64>) -> Result<Vec<PredictionResult>> {
        let vocab = self.pipeline.label_vocab();
        let mut results = Vec::with_capacity(proba.nrows());

        for row in proba.rows() {
            let (best_key, best_p) = row
                .iter()
                .copied()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .unwrap_or((0, 0.0));

            let area = vocab
                .decode(best_key)
                .ok_or_else(|| {
                    TriageError::Training(format!("predicted key {best_key} has no known area"))
                })?
                .to_string();

            let scores = vocab
                .labels()
                .iter()
                .zip(row.iter())
                .map(|(label, p)| (label.clone(), *p))
                .collect();

            results.push(PredictionResult {
                area,
                confidence: best_p,
                scores,
            });
        }

        Ok(results)
    }
}

impl Transformer for TriageModel {
    fn transform(&self, dataset: &IssueDataset) -> Result<Vec<PredictionResult>> {
        let cache = self.pipeline.materialize(dataset)?;
        let proba = self.classifier.predict_proba(cache.features());
        self.decode_proba(&proba)
    }

    fn predict_single(&self, record: &IssueRecord) -> Result<PredictionResult> {
        let features = self.pipeline.featurize(record)?;
        let matrix = Array2::from_shape_vec((1, features.len()), features)
            .map_err(|e| TriageError::Training(format!("failed to shape feature row: {e}")))?;

        let proba = self.classifier.predict_proba(&matrix);
        let mut results = self.decode_proba(&proba)?;
        Ok(results.remove(0))
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| TriageError::Serialization(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| TriageError::CorruptArtifact(format!("failed to decode model: {e}")))
    }
}
