use ndarray::{ArrayView1, ArrayView2};

use crate::estimators::error::{EstimatorError, Result};
use crate::estimators::traits::Predict;
use crate::variants::FittedModel;
use crate::Float;


/// Held-out error of one fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score<F> {
    pub mse: F,
    /// Whether the underlying solver met its tolerance.
    pub converged: bool,
}

/// Mean of the squared differences between targets and predictions.
pub fn mean_squared_error<F: Float>(y_true: ArrayView1<F>, y_pred: ArrayView1<F>) -> Result<F> {
    if y_true.is_empty() {
        return Err(EstimatorError::EmptyDataset);
    }
    if y_true.len() != y_pred.len() {
        return Err(EstimatorError::DimensionMismatch {
            what: "number of predictions",
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    let sum = y_true
        .iter()
        .zip(y_pred.iter())
        .fold(F::zero(), |acc, (&t, &p)| acc + (t - p) * (t - p));
    Ok(sum / F::cast(y_true.len()))
}

/// Scores `model` on held-out records.
pub fn evaluate<F: Float>(
    model: &FittedModel<F>,
    x_test: ArrayView2<F>,
    y_test: ArrayView1<F>,
) -> Result<Score<F>> {
    if x_test.nrows() != y_test.len() {
        return Err(EstimatorError::DimensionMismatch {
            what: "number of targets",
            expected: x_test.nrows(),
            actual: y_test.len(),
        });
    }
    if y_test.is_empty() {
        return Err(EstimatorError::EmptyDataset);
    }
    let y_pred = model.predict(x_test)?;
    Ok(Score {
        mse: mean_squared_error(y_test, y_pred.view())?,
        converged: model.converged(),
    })
}
