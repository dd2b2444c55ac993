use ndarray::{Array1, Array2, ArrayView2};
use ndarray_stats::errors::MinMaxError;
use ndarray_stats::QuantileExt;

use super::check_n_features;
use crate::estimators::error::{EstimatorError, Result};
use crate::Float;

/// Expands every feature into a B-spline basis.
///
/// For each feature, `n_knots` uniformly spaced knots span the training
/// range and `degree` extra knots with the same spacing are added on both
/// sides, which yields `n_knots + degree - 1` basis functions per feature.
/// Inputs outside the training range are clamped to it, so the expansion is
/// constant beyond the boundary knots.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineTransformer<F> {
    degree: usize,
    n_knots: usize,
    lower: Array1<F>,
    upper: Array1<F>,
    knots: Vec<Array1<F>>,
}

impl<F: Float> SplineTransformer<F> {
    pub fn fit(records: ArrayView2<F>, degree: usize, n_knots: usize) -> Result<Self> {
        if degree < 1 {
            return Err(EstimatorError::InvalidDegree(degree));
        }
        if n_knots < 2 {
            return Err(EstimatorError::InvalidKnots(n_knots));
        }
        if records.ncols() == 0 {
            return Err(EstimatorError::EmptyFeatureSet);
        }

        let n_features = records.ncols();
        let mut lower = Array1::<F>::zeros(n_features);
        let mut upper = Array1::<F>::zeros(n_features);
        let mut knots = Vec::with_capacity(n_features);

        for (j, column) in records.columns().into_iter().enumerate() {
            let min = *column.min().map_err(from_min_max)?;
            let max = *column.max().map_err(from_min_max)?;
            let spacing = if max > min {
                (max - min) / F::cast(n_knots - 1)
            } else {
                F::one()
            };
            let n_total = n_knots + 2 * degree;
            knots.push(Array1::from_shape_fn(n_total, |i| {
                min + spacing * (F::cast(i) - F::cast(degree))
            }));
            lower[j] = min;
            upper[j] = max;
        }

        Ok(SplineTransformer {
            degree,
            n_knots,
            lower,
            upper,
            knots,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn n_knots(&self) -> usize {
        self.n_knots
    }

    pub fn n_input_features(&self) -> usize {
        self.knots.len()
    }

    pub fn n_basis_per_feature(&self) -> usize {
        self.n_knots + self.degree - 1
    }

    pub fn n_output_features(&self) -> usize {
        self.n_input_features() * self.n_basis_per_feature()
    }

    pub fn transform(&self, records: ArrayView2<F>) -> Result<Array2<F>> {
        check_n_features(self.n_input_features(), records.ncols())?;
        let n_basis = self.n_basis_per_feature();
        let mut out = Array2::<F>::zeros((records.nrows(), self.n_output_features()));

        for (j, knots) in self.knots.iter().enumerate() {
            for (i, &value) in records.column(j).iter().enumerate() {
                let x = value.max(self.lower[j]).min(self.upper[j]);
                let basis = bspline_basis(knots, self.degree, x);
                for (k, &b) in basis.iter().take(n_basis).enumerate() {
                    out[[i, j * n_basis + k]] = b;
                }
            }
        }
        Ok(out)
    }
}

/// Values at `x` of every B-spline of the given degree on `knots`, computed
/// with the Cox-de Boor recursion. Only the first
/// `knots.len() - degree - 1` entries are meaningful.
fn bspline_basis<F: Float>(knots: &Array1<F>, degree: usize, x: F) -> Vec<F> {
    let m = knots.len();
    let mut b: Vec<F> = (0..m - 1)
        .map(|i| {
            if knots[i] <= x && x < knots[i + 1] {
                F::one()
            } else {
                F::zero()
            }
        })
        .collect();

    for p in 1..=degree {
        for i in 0..(m - 1 - p) {
            let left_den = knots[i + p] - knots[i];
            let right_den = knots[i + p + 1] - knots[i + 1];
            let left = if left_den != F::zero() {
                (x - knots[i]) / left_den * b[i]
            } else {
                F::zero()
            };
            let right = if right_den != F::zero() {
                (knots[i + p + 1] - x) / right_den * b[i + 1]
            } else {
                F::zero()
            };
            b[i] = left + right;
        }
    }
    b
}

fn from_min_max(err: MinMaxError) -> EstimatorError {
    match err {
        MinMaxError::EmptyInput => EstimatorError::EmptyDataset,
        MinMaxError::UndefinedOrder => EstimatorError::NonFiniteValue("spline input".to_string()),
    }
}
