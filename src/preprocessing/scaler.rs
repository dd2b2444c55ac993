use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::check_n_features;
use crate::estimators::error::{EstimatorError, Result};
use crate::Float;

/// Standardizes features to zero mean and unit variance.
///
/// The statistics are those of the records given to [`StandardScaler::fit`];
/// columns with zero variance are only centred.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler<F> {
    mean: Array1<F>,
    scale: Array1<F>,
}

impl<F: Float> StandardScaler<F> {
    pub fn fit(records: ArrayView2<F>) -> Result<Self> {
        if records.nrows() == 0 {
            return Err(EstimatorError::EmptyDataset);
        }
        let mean = records
            .mean_axis(Axis(0))
            .ok_or(EstimatorError::EmptyDataset)?;
        let variance = records.var_axis(Axis(0), F::zero());
        if variance.iter().any(|v| !v.is_finite()) {
            return Err(EstimatorError::NonFiniteResult("standardization"));
        }
        let scale = variance.mapv(|v| {
            let std = v.sqrt();
            if std > F::zero() {
                std
            } else {
                F::one()
            }
        });
        Ok(StandardScaler { mean, scale })
    }

    pub fn transform(&self, records: ArrayView2<F>) -> Result<Array2<F>> {
        check_n_features(self.mean.len(), records.ncols())?;
        Ok((&records - &self.mean) / &self.scale)
    }

    pub fn mean(&self) -> ArrayView1<F> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<F> {
        self.scale.view()
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}
