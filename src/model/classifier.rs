use crate::config::TrainerConfig;
use crate::error::{Result, TriageError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

/// Multiclass linear classifier over the materialized feature matrix.
///
/// Fitting is delegated to smartcore's logistic regression solver. The
/// fitted coefficients and intercepts are extracted into plain arrays, so the
/// serialized model is self-contained and batch and single-record inference
/// run through the same linear-score-plus-softmax path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Weight matrix, one row per class
    weights: Array2<f64>,

    /// Bias term per class
    bias: Array1<f64>,

    /// Number of classes
    n_classes: usize,
}

impl LinearClassifier {
    /// Fit the classifier on a feature matrix and encoded labels
    pub fn fit(
        features: &Array2<f64>,
        labels: &[usize],
        n_classes: usize,
        params: &TrainerConfig,
    ) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(TriageError::Training(
                "cannot train a classifier on an empty dataset".to_string(),
            ));
        }
        if features.nrows() != labels.len() {
            return Err(TriageError::Training(format!(
                "feature matrix has {} rows but {} labels were provided",
                features.nrows(),
                labels.len()
            )));
        }
        if n_classes < 2 {
            return Err(TriageError::Training(
                "training data must contain at least two distinct area labels".to_string(),
            ));
        }

        let x = ndarray_to_densematrix(features);
        let y: Vec<i32> = labels.iter().map(|&l| l as i32).collect();

        let parameters = LogisticRegressionParameters::default().with_alpha(params.alpha);
        let model = LogisticRegression::fit(&x, &y, parameters)
            .map_err(|e| TriageError::Training(format!("logistic regression fit failed: {e}")))?;

        let n_features = features.ncols();
        let (weights, bias) = extract_parameters(&model, n_classes, n_features)?;

        Ok(Self {
            weights,
            bias,
            n_classes,
        })
    }

    /// Per-class probabilities for each row of a feature matrix
    pub fn predict_proba(&self, features: &Array2<f64>) -> Array2<f64> {
        let mut scores = features.dot(&self.weights.t());
        for mut row in scores.rows_mut() {
            row += &self.bias;
            softmax_inplace(row.as_slice_mut().expect("score rows are contiguous"));
        }
        scores
    }

    /// Predicted class key for each row of a feature matrix
    pub fn predict(&self, features: &Array2<f64>) -> Vec<usize> {
        let proba = self.predict_proba(features);
        proba
            .rows()
            .into_iter()
            .map(|row| argmax(row.as_slice().expect("probability rows are contiguous")))
            .collect()
    }

    /// Number of classes
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of input features
    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }
}

fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
    let data: Vec<f64> = arr.iter().copied().collect();
    DenseMatrix::new(arr.nrows(), arr.ncols(), data, false)
}

/// Pull the fitted coefficients out of the smartcore model.
///
/// smartcore stores a single weight row for two-class problems; that row is
/// expanded to the two-row softmax form so inference never special-cases the
/// binary layout.
fn extract_parameters(
    model: &LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>,
    n_classes: usize,
    n_features: usize,
) -> Result<(Array2<f64>, Array1<f64>)> {
    let coef = model.coefficients();
    let intercept = model.intercept();
    let (coef_rows, coef_cols) = coef.shape();

    if coef_cols != n_features {
        return Err(TriageError::Training(format!(
            "solver returned {} coefficients per class, expected {}",
            coef_cols, n_features
        )));
    }

    if coef_rows == n_classes {
        let mut weights = Array2::zeros((n_classes, n_features));
        let mut bias = Array1::zeros(n_classes);
        for c in 0..n_classes {
            for j in 0..n_features {
                weights[[c, j]] = *coef.get((c, j));
            }
            bias[c] = *intercept.get((c, 0));
        }
        Ok((weights, bias))
    } else if coef_rows == 1 && n_classes == 2 {
        // softmax([0, w.x + b]) == sigmoid(w.x + b)
        let mut weights = Array2::zeros((2, n_features));
        let mut bias = Array1::zeros(2);
        for j in 0..n_features {
            weights[[1, j]] = *coef.get((0, j));
        }
        bias[1] = *intercept.get((0, 0));
        Ok((weights, bias))
    } else {
        Err(TriageError::Training(format!(
            "solver returned {} weight rows for {} classes",
            coef_rows, n_classes
        )))
    }
}

/// Softmax in place, with max subtraction for numerical stability
fn softmax_inplace(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }

    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max_val).exp();
        sum += *v;
    }

    if sum > 0.0 {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}

/// Index of the maximum value
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}
