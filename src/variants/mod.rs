//! The closed set of fitting strategies compared by the pipeline.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::datasets::DatasetBase;
use crate::estimators::error::{EstimatorError, Result};
use crate::estimators::traits::{Fit, Predict};
use crate::estimators::{
    Lasso, LassoParams, LinearRegression, LinearRegressionParams, PolynomialRegression,
    PolynomialRegressionParams, Ridge, RidgeParams, SplineRegression, SplineRegressionParams,
};
use crate::Float;


/// A named, configured regression strategy. Fitting it yields a
/// [`FittedModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Variant<F> {
    Linear(LinearRegressionParams),
    Lasso(LassoParams<F>),
    Ridge(RidgeParams<F>),
    Polynomial(PolynomialRegressionParams),
    Spline(SplineRegressionParams),
}

impl<F: Float> Variant<F> {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Linear(_) => "Linear Regression",
            Variant::Lasso(_) => "Lasso Regression",
            Variant::Ridge(_) => "Ridge Regression",
            Variant::Polynomial(_) => "Polynomial Regression",
            Variant::Spline(_) => "Spline Regression",
        }
    }

    /// Fits the strategy on `(x, y)`. Hyperparameters are checked first.
    pub fn fit(&self, x: ArrayView2<F>, y: ArrayView1<F>) -> Result<FittedModel<F>> {
        let dataset = DatasetBase::new(x, y);
        let model = match self {
            Variant::Linear(params) => FittedModel::Linear(params.fit(&dataset)?),
            Variant::Lasso(params) => FittedModel::Lasso(params.fit(&dataset)?),
            Variant::Ridge(params) => FittedModel::Ridge(params.fit(&dataset)?),
            Variant::Polynomial(params) => FittedModel::Polynomial(params.fit(&dataset)?),
            Variant::Spline(params) => FittedModel::Spline(params.fit(&dataset)?),
        };
        Ok(model)
    }
}

/// An immutable fitted model of any [`Variant`].
#[derive(Debug, Clone, PartialEq)]
pub enum FittedModel<F> {
    Linear(LinearRegression<F>),
    Lasso(Lasso<F>),
    Ridge(Ridge<F>),
    Polynomial(PolynomialRegression<F>),
    Spline(SplineRegression<F>),
}

impl<F: Float> FittedModel<F> {
    /// Closed-form variants always converge.
    pub fn converged(&self) -> bool {
        match self {
            FittedModel::Lasso(model) => model.converged(),
            FittedModel::Ridge(model) => model.converged(),
            _ => true,
        }
    }

    /// Turns a model whose solver hit its epoch cap into an error.
    pub fn require_converged(self) -> Result<Self> {
        let n_epochs = match &self {
            FittedModel::Lasso(model) if !model.converged() => model.n_epochs(),
            FittedModel::Ridge(model) if !model.converged() => model.n_epochs(),
            _ => return Ok(self),
        };
        Err(EstimatorError::NonConvergence(n_epochs))
    }
}

impl<F: Float> Predict<F> for FittedModel<F> {
    fn predict(&self, records: ArrayView2<F>) -> Result<Array1<F>> {
        match self {
            FittedModel::Linear(model) => model.predict(records),
            FittedModel::Lasso(model) => model.predict(records),
            FittedModel::Ridge(model) => model.predict(records),
            FittedModel::Polynomial(model) => model.predict(records),
            FittedModel::Spline(model) => model.predict(records),
        }
    }
}
