#[cfg(test)]
mod tests;

pub mod error;
#[allow(clippy::module_inception)]
pub mod estimators;
pub mod hyperparams;
pub mod param_guard;
pub mod traits;

pub use estimators::{Lasso, LinearRegression, PolynomialRegression, Ridge, SplineRegression};
pub use hyperparams::{
    LassoParams, LinearRegressionParams, PolynomialRegressionParams, RidgeParams,
    SplineRegressionParams,
};
