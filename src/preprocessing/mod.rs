//! Fit-once feature transforms.
//!
//! Every transform is fitted on training records only and is an immutable
//! value afterwards: applying it to test records never refits anything.

mod polynomial;
mod scaler;
mod spline;

#[cfg(test)]
mod tests;

pub use polynomial::PolynomialFeatures;
pub use scaler::StandardScaler;
pub use spline::SplineTransformer;

use crate::estimators::error::{EstimatorError, Result};

pub(crate) fn check_n_features(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EstimatorError::DimensionMismatch {
            what: "number of features",
            expected,
            actual,
        });
    }
    Ok(())
}
