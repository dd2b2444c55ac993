use ndarray::{Array2, ArrayView2};

use super::check_n_features;
use crate::estimators::error::{EstimatorError, Result};
use crate::Float;

/// Expands features into every monomial of total degree `1..=degree`,
/// interactions included.
///
/// Monomials are ordered by degree, then lexicographically by the indices of
/// the features they multiply: for two features and degree 2 the output is
/// `x0, x1, x0^2, x0 x1, x1^2`. No constant column is emitted, the linear
/// models fit their own intercept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialFeatures {
    n_features: usize,
    degree: usize,
    monomials: Vec<Vec<usize>>,
}

impl PolynomialFeatures {
    pub fn new(n_features: usize, degree: usize) -> Result<Self> {
        if degree < 1 {
            return Err(EstimatorError::InvalidDegree(degree));
        }
        if n_features == 0 {
            return Err(EstimatorError::EmptyFeatureSet);
        }

        let mut monomials = Vec::new();
        for d in 1..=degree {
            let mut current = Vec::with_capacity(d);
            push_combinations(n_features, d, 0, &mut current, &mut monomials);
        }

        Ok(PolynomialFeatures {
            n_features,
            degree,
            monomials,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn n_input_features(&self) -> usize {
        self.n_features
    }

    pub fn n_output_features(&self) -> usize {
        self.monomials.len()
    }

    /// Feature indices multiplied together by each output column.
    pub fn monomials(&self) -> &[Vec<usize>] {
        &self.monomials
    }

    pub fn transform<F: Float>(&self, records: ArrayView2<F>) -> Result<Array2<F>> {
        check_n_features(self.n_features, records.ncols())?;
        Ok(Array2::from_shape_fn(
            (records.nrows(), self.monomials.len()),
            |(i, k)| {
                self.monomials[k]
                    .iter()
                    .fold(F::one(), |acc, &j| acc * records[[i, j]])
            },
        ))
    }
}

/// Non-decreasing index sequences of length `remaining + current.len()`.
fn push_combinations(
    n_features: usize,
    remaining: usize,
    start: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if remaining == 0 {
        out.push(current.clone());
        return;
    }
    for j in start..n_features {
        current.push(j);
        push_combinations(n_features, remaining - 1, j, current, out);
        current.pop();
    }
}
