//! Single-record prediction.

use crate::data::record::IssueRecord;
use crate::error::Result;
use crate::model::{PredictionResult, Transformer};
use tracing::debug;

/// Convenience wrapper for predicting one ad-hoc record at a time.
///
/// Delegates to the model's single-record path, which runs the identical
/// transform chain as batch evaluation, so training-time and serving-time
/// featurization cannot drift apart.
pub struct PredictionEngine<'a, T: Transformer> {
    model: &'a T,
}

impl<'a, T: Transformer> PredictionEngine<'a, T> {
    /// Create an engine bound to a trained model
    pub fn new(model: &'a T) -> Self {
        Self { model }
    }

    /// Predict the area for a single record; the record's own area, if any,
    /// is ignored
    pub fn predict(&self, record: &IssueRecord) -> Result<PredictionResult> {
        let prediction = self.model.predict_single(record)?;
        debug!(
            "Predicted area {:?} with confidence {:.3}",
            prediction.area, prediction.confidence
        );
        Ok(prediction)
    }
}
