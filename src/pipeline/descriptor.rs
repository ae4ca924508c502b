use crate::data::record::{COLUMN_AREA, COLUMN_DESCRIPTION, COLUMN_TITLE};
use serde::{Deserialize, Serialize};

/// Column produced by the label encoding step
pub const COLUMN_LABEL: &str = "Label";

/// Column produced by featurizing the title
pub const COLUMN_TITLE_FEATURIZED: &str = "TitleFeaturized";

/// Column produced by featurizing the description
pub const COLUMN_DESCRIPTION_FEATURIZED: &str = "DescriptionFeaturized";

/// Column produced by the concatenation step
pub const COLUMN_FEATURES: &str = "Features";

/// Column produced by the classifier and decoded back to an area name
pub const COLUMN_PREDICTED_LABEL: &str = "PredictedLabel";

/// Kind of transform a pipeline step applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Map a categorical text value to an integer key
    MapValueToKey,

    /// Featurize a text column into a numeric vector
    FeaturizeText,

    /// Concatenate numeric vector columns into one
    Concatenate,

    /// Materialize the upstream columns so later passes re-read them
    CacheCheckpoint,

    /// Fit the multiclass classifier
    TrainClassifier,

    /// Map a predicted integer key back to its text value
    MapKeyToValue,
}

/// A single named transform step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    /// Step name
    pub name: String,

    /// Transform kind
    pub kind: StepKind,

    /// Input column names
    pub inputs: Vec<String>,

    /// Output column name
    pub output: String,
}

impl PipelineStep {
    fn new(name: &str, kind: StepKind, inputs: &[&str], output: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        }
    }
}

/// An ordered, immutable sequence of named transform steps
///
/// Built once by [`feature_pipeline`] and extended with the training steps by
/// the trainer. The descriptor is declarative; the fitted state produced by
/// executing it lives in the trained model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    steps: Vec<PipelineStep>,
}

impl PipelineDescriptor {
    /// The steps in execution order
    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Append the classifier and label-decoding steps, consuming the
    /// feature pipeline
    pub fn with_training_steps(mut self) -> Self {
        self.steps.push(PipelineStep::new(
            "train_classifier",
            StepKind::TrainClassifier,
            &[COLUMN_LABEL, COLUMN_FEATURES],
            COLUMN_PREDICTED_LABEL,
        ));
        self.steps.push(PipelineStep::new(
            "map_key_to_area",
            StepKind::MapKeyToValue,
            &[COLUMN_PREDICTED_LABEL],
            COLUMN_PREDICTED_LABEL,
        ));
        debug_assert!(self.wiring_is_consistent());
        self
    }

    /// Check that every step consumes columns produced by the source schema
    /// or by an earlier step
    pub fn wiring_is_consistent(&self) -> bool {
        let mut available = vec![
            COLUMN_TITLE.to_string(),
            COLUMN_DESCRIPTION.to_string(),
            COLUMN_AREA.to_string(),
        ];

        for step in &self.steps {
            if step.inputs.iter().any(|input| !available.contains(input)) {
                return false;
            }
            available.push(step.output.clone());
        }

        true
    }
}

/// Build the fixed feature-extraction pipeline.
///
/// The five steps mirror the shape of the trained model: area labels are
/// encoded to keys, both text columns are featurized independently, the two
/// vectors are concatenated, and the result is materialized behind a cache
/// checkpoint so the trainer re-reads the matrix instead of re-running
/// featurization.
pub fn feature_pipeline() -> PipelineDescriptor {
    let descriptor = PipelineDescriptor {
        steps: vec![
            PipelineStep::new(
                "map_area_to_label",
                StepKind::MapValueToKey,
                &[COLUMN_AREA],
                COLUMN_LABEL,
            ),
            PipelineStep::new(
                "featurize_title",
                StepKind::FeaturizeText,
                &[COLUMN_TITLE],
                COLUMN_TITLE_FEATURIZED,
            ),
            PipelineStep::new(
                "featurize_description",
                StepKind::FeaturizeText,
                &[COLUMN_DESCRIPTION],
                COLUMN_DESCRIPTION_FEATURIZED,
            ),
            PipelineStep::new(
                "concatenate_features",
                StepKind::Concatenate,
                &[COLUMN_TITLE_FEATURIZED, COLUMN_DESCRIPTION_FEATURIZED],
                COLUMN_FEATURES,
            ),
            PipelineStep::new(
                "cache_checkpoint",
                StepKind::CacheCheckpoint,
                &[COLUMN_FEATURES],
                COLUMN_FEATURES,
            ),
        ],
    };
    debug_assert!(descriptor.wiring_is_consistent());
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_pipeline_has_five_fixed_steps() {
        let descriptor = feature_pipeline();
        let names: Vec<&str> = descriptor.steps().iter().map(|s| s.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "map_area_to_label",
                "featurize_title",
                "featurize_description",
                "concatenate_features",
                "cache_checkpoint",
            ]
        );
    }

    #[test]
    fn test_training_steps_appended() {
        let descriptor = feature_pipeline().with_training_steps();
        let steps = descriptor.steps();

        assert_eq!(steps.len(), 7);
        assert_eq!(steps[5].kind, StepKind::TrainClassifier);
        assert_eq!(steps[5].inputs, vec![COLUMN_LABEL, COLUMN_FEATURES]);
        assert_eq!(steps[6].kind, StepKind::MapKeyToValue);
        assert_eq!(steps[6].output, COLUMN_PREDICTED_LABEL);
    }

    #[test]
    fn test_wiring_is_consistent() {
        assert!(feature_pipeline().wiring_is_consistent());
        assert!(feature_pipeline().with_training_steps().wiring_is_consistent());
    }

    #[test]
    fn test_wiring_catches_missing_column() {
        let mut descriptor = feature_pipeline();
        descriptor.steps[3].inputs = vec!["NoSuchColumn".to_string()];
        assert!(!descriptor.wiring_is_consistent());
    }
}
