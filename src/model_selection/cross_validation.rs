use ndarray::{ArrayView1, ArrayView2};

use super::split::Split;
use crate::estimators::error::{EstimatorError, Result};
use crate::metrics::{evaluate, Score};
use crate::variants::Variant;
use crate::Float;

/// Result of one cross-validation fold. A failing fold does not stop the
/// others.
pub type FoldOutcome<F> = std::result::Result<Score<F>, EstimatorError>;

/// Contiguous, unshuffled k-fold partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_folds: usize,
}

impl KFold {
    pub fn new(n_folds: usize) -> Self {
        KFold { n_folds }
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// One [`Split`] per fold, in order. The first `n_samples % n_folds` folds
    /// hold one extra sample.
    pub fn split(&self, n_samples: usize) -> Result<Vec<Split>> {
        let k = self.n_folds;
        if k < 2 || k > n_samples {
            return Err(EstimatorError::InvalidFolds {
                n_folds: k,
                n_samples,
            });
        }

        let base = n_samples / k;
        let remainder = n_samples % k;
        let mut folds = Vec::with_capacity(k);
        let mut start = 0;
        for fold in 0..k {
            let size = if fold < remainder { base + 1 } else { base };
            let end = start + size;
            let test: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n_samples).collect();
            folds.push(Split::from_indices(train, test));
            start = end;
        }
        Ok(folds)
    }
}

/// Fits and scores `variant` once per fold.
///
/// Invalid fold counts or mismatched inputs fail the whole call. Otherwise
/// exactly `n_folds` outcomes are returned in fold order.
pub fn cross_validate<F: Float>(
    variant: &Variant<F>,
    x: ArrayView2<F>,
    y: ArrayView1<F>,
    n_folds: usize,
) -> Result<Vec<FoldOutcome<F>>> {
    if x.nrows() != y.len() {
        return Err(EstimatorError::DimensionMismatch {
            what: "number of targets",
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    let folds = KFold::new(n_folds).split(x.nrows())?;

    let outcomes = folds
        .iter()
        .enumerate()
        .map(|(i, fold)| {
            let outcome = fold.apply(x, y).and_then(|(x_train, x_test, y_train, y_test)| {
                let model = variant.fit(x_train.view(), y_train.view())?;
                evaluate(&model, x_test.view(), y_test.view())
            });
            match &outcome {
                Ok(score) => log::debug!("{} fold {}: mse {}", variant.name(), i, score.mse),
                Err(err) => log::warn!("{} fold {} failed: {}", variant.name(), i, err),
            }
            outcome
        })
        .collect();
    Ok(outcomes)
}
