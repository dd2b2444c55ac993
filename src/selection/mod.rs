//! Recursive feature elimination driven by ordinary least squares.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use std::cmp::Ordering;

use crate::datasets::{DatasetBase, FeatureSet};
use crate::estimators::error::{EstimatorError, Result};
use crate::estimators::hyperparams::LinearRegressionParams;
use crate::estimators::param_guard::ParamGuard;
use crate::estimators::traits::Fit;
use crate::helpers::helpers::argsort_by;
use crate::Float;


/// Outcome of a recursive feature elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rfe {
    support: Vec<usize>,
    ranking: Vec<usize>,
}

impl Rfe {
    /// Repeatedly fits a linear model on the remaining columns and drops the
    /// one with the smallest absolute coefficient until `n_selected` remain.
    /// On ties the later column is dropped.
    pub fn fit<F: Float>(x: ArrayView2<F>, y: ArrayView1<F>, n_selected: usize) -> Result<Self> {
        let n_features = x.ncols();
        if n_selected < 1 || n_selected > n_features {
            return Err(EstimatorError::InvalidFeatureCount {
                requested: n_selected,
                available: n_features,
            });
        }
        if x.nrows() != y.len() {
            return Err(EstimatorError::DimensionMismatch {
                what: "number of targets",
                expected: x.nrows(),
                actual: y.len(),
            });
        }

        let params = LinearRegressionParams::new().check()?;
        let mut remaining: Vec<usize> = (0..n_features).collect();
        let mut ranking = vec![1; n_features];

        while remaining.len() > n_selected {
            let columns = x.select(Axis(1), &remaining);
            let model = params.fit(&DatasetBase::new(columns.view(), y))?;
            let importance: Array1<F> = model.coefficients().mapv(|w| w.abs());

            // Stable descending order, the last entry is the least important
            // and the latest among equals.
            let order = argsort_by(&importance, |a, b| {
                b.partial_cmp(a).unwrap_or(Ordering::Equal)
            });
            let position = order[order.len() - 1];
            let dropped = remaining.remove(position);
            ranking[dropped] = remaining.len() + 2 - n_selected;
            log::debug!(
                "eliminated column {} (|w| = {}), {} left",
                dropped,
                importance[position],
                remaining.len()
            );
        }

        Ok(Rfe {
            support: remaining,
            ranking,
        })
    }

    /// Indices of the kept columns, in their original order.
    pub fn support(&self) -> &[usize] {
        &self.support
    }

    /// `1` for kept columns, larger values for columns eliminated earlier.
    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }
}

/// Selects the `n_selected` most important of the named columns of `x`.
/// The returned names keep the order of `feature_names`.
pub fn select<F: Float>(
    x: ArrayView2<F>,
    y: ArrayView1<F>,
    feature_names: &[String],
    n_selected: usize,
) -> Result<FeatureSet> {
    if feature_names.len() != x.ncols() {
        return Err(EstimatorError::DimensionMismatch {
            what: "number of feature names",
            expected: x.ncols(),
            actual: feature_names.len(),
        });
    }
    let rfe = Rfe::fit(x, y, n_selected)?;
    FeatureSet::new(rfe.support().iter().map(|&j| feature_names[j].as_str()))
}
