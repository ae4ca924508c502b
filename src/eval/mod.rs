//! Batch evaluation of a trained model against a held-out dataset.

use crate::data::record::IssueDataset;
use crate::error::{Result, TriageError};
use crate::model::{Transformer, TriageModel};
use std::collections::BTreeMap;
use tracing::info;

/// Probability clamp for log-loss computation
const EPS: f64 = 1e-15;

/// Aggregate multiclass classification metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationMetrics {
    /// Fraction of correct predictions over all rows
    pub micro_accuracy: f64,

    /// Mean per-class accuracy over the classes present in the truth labels
    pub macro_accuracy: f64,

    /// Mean negative log probability of the true class
    pub log_loss: f64,

    /// Relative improvement of the log loss over the label-prior baseline
    pub log_loss_reduction: f64,
}

impl ClassificationMetrics {
    /// Human-readable metrics block.
    ///
    /// Values are rounded to three decimals for display only.
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(
            "*************************************************************************\n",
        );
        out.push_str("*    Metrics for multiclass classification model - Test Data\n");
        out.push_str(
            "*------------------------------------------------------------------------\n",
        );
        out.push_str(&format!("*    MicroAccuracy:    {:.3}\n", self.micro_accuracy));
        out.push_str(&format!("*    MacroAccuracy:    {:.3}\n", self.macro_accuracy));
        out.push_str(&format!("*    LogLoss:          {:.3}\n", self.log_loss));
        out.push_str(&format!("*    LogLossReduction: {:.3}\n", self.log_loss_reduction));
        out.push_str(
            "*************************************************************************",
        );
        out
    }
}

/// Apply a trained model to a held-out dataset and score the predictions.
///
/// Pure computation over the model's transform output; neither the model nor
/// the dataset is mutated. Every row of the dataset must carry an area label.
pub fn evaluate(model: &TriageModel, dataset: &IssueDataset) -> Result<ClassificationMetrics> {
    if dataset.is_empty() {
        return Err(TriageError::Training(
            "cannot evaluate on an empty dataset".to_string(),
        ));
    }

    let predictions = model.transform(dataset)?;

    let n = dataset.len() as f64;
    let mut correct = 0usize;
    let mut sum_log_loss = 0.0f64;

    // Per-class tallies keyed by the truth label, so areas the model has
    // never seen still count against macro accuracy.
    let mut class_total: BTreeMap<&str, usize> = BTreeMap::new();
    let mut class_correct: BTreeMap<&str, usize> = BTreeMap::new();

    for (record, prediction) in dataset.iter().zip(predictions.iter()) {
        let truth = record.area.as_deref().ok_or_else(|| {
            TriageError::SchemaMismatch(
                "evaluation dataset contains a row without an area label".to_string(),
            )
        })?;

        *class_total.entry(truth).or_insert(0) += 1;
        if prediction.area == truth {
            correct += 1;
            *class_correct.entry(truth).or_insert(0) += 1;
        }

        let p_true = prediction
            .scores
            .iter()
            .find(|(label, _)| label == truth)
            .map(|(_, p)| *p)
            .unwrap_or(0.0);
        sum_log_loss += -p_true.clamp(EPS, 1.0 - EPS).ln();
    }

    let micro_accuracy = correct as f64 / n;

    let macro_accuracy = class_total
        .iter()
        .map(|(label, total)| {
            let right = class_correct.get(label).copied().unwrap_or(0);
            right as f64 / *total as f64
        })
        .sum::<f64>()
        / class_total.len() as f64;

    let log_loss = sum_log_loss / n;
    let prior_log_loss = prior_log_loss(&class_total, n);
    let log_loss_reduction = if prior_log_loss > 0.0 {
        (prior_log_loss - log_loss) / prior_log_loss
    } else {
        0.0
    };

    info!(
        "Evaluated {} issues: micro accuracy {:.3}, macro accuracy {:.3}",
        dataset.len(),
        micro_accuracy,
        macro_accuracy
    );

    Ok(ClassificationMetrics {
        micro_accuracy,
        macro_accuracy,
        log_loss,
        log_loss_reduction,
    })
}

/// Log loss of always predicting the test-set label distribution
fn prior_log_loss(class_total: &BTreeMap<&str, usize>, n: f64) -> f64 {
    class_total
        .values()
        .map(|&count| {
            let p = count as f64 / n;
            -(count as f64) * p.clamp(EPS, 1.0 - EPS).ln()
        })
        .sum::<f64>()
        / n
}
