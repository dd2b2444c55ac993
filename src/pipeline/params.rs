use crate::datasets::{DatasetError, DatasetProvider, Table};
use crate::estimators::error::{EstimatorError, Result};
use crate::estimators::param_guard::ParamGuard;
use crate::estimators::{
    LassoParams, LinearRegressionParams, PolynomialRegressionParams, RidgeParams,
    SplineRegressionParams,
};
use crate::variants::Variant;

use super::report::ComparisonReport;
use super::run_checked;

/// A verified configuration of a comparison run
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonValidParams {
    test_fraction: f64,
    seed: u64,
    n_selected_features: usize,
    variance_fraction: f64,
    alpha: f64,
    polynomial_degree: usize,
    spline_degree: usize,
    spline_n_knots: usize,
    cv_folds: usize,
    max_iterations: usize,
    tolerance: f64,
    simple_feature: Option<String>,
}

impl ComparisonValidParams {
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn n_selected_features(&self) -> usize {
        self.n_selected_features
    }

    pub fn variance_fraction(&self) -> f64 {
        self.variance_fraction
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn polynomial_degree(&self) -> usize {
        self.polynomial_degree
    }

    pub fn spline_degree(&self) -> usize {
        self.spline_degree
    }

    pub fn spline_n_knots(&self) -> usize {
        self.spline_n_knots
    }

    pub fn cv_folds(&self) -> usize {
        self.cv_folds
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn simple_feature(&self) -> Option<&str> {
        self.simple_feature.as_deref()
    }

    /// Every variant compared in the full, selected and reduced regimes, in
    /// report order.
    pub fn variants(&self) -> Vec<Variant<f64>> {
        vec![
            Variant::Linear(LinearRegressionParams::new()),
            Variant::Lasso(
                LassoParams::new()
                    .alpha(self.alpha)
                    .max_iterations(self.max_iterations)
                    .tolerance(self.tolerance),
            ),
            Variant::Ridge(
                RidgeParams::new()
                    .alpha(self.alpha)
                    .max_iterations(self.max_iterations)
                    .tolerance(self.tolerance),
            ),
            Variant::Polynomial(PolynomialRegressionParams::new().degree(self.polynomial_degree)),
            Variant::Spline(
                SplineRegressionParams::new()
                    .degree(self.spline_degree)
                    .n_knots(self.spline_n_knots),
            ),
        ]
    }

    /// Runs every regime on `table`. Per-entry failures are recorded in the
    /// report, nothing here aborts.
    pub fn run(&self, table: &Table) -> ComparisonReport {
        run_checked(self, table)
    }
}

/// Configures a comparison run
///
/// Every setting has a default, so `ComparisonParams::new().run(&table)`
/// compares all variants with a 80/20 split, 3 selected features, a PCA
/// keeping 95% of the variance and 5-fold cross-validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonParams(ComparisonValidParams);

impl Default for ComparisonParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonParams {
    pub fn new() -> ComparisonParams {
        Self(ComparisonValidParams {
            test_fraction: 0.2,
            seed: 42,
            n_selected_features: 3,
            variance_fraction: 0.95,
            alpha: 1.,
            polynomial_degree: 2,
            spline_degree: 3,
            spline_n_knots: 5,
            cv_folds: 5,
            max_iterations: 20000,
            tolerance: 1e-4,
            simple_feature: None,
        })
    }

    /// Share of the rows held out for testing.
    ///
    /// Defaults to `0.2` if not set.
    pub fn test_fraction(mut self, test_fraction: f64) -> Self {
        self.0.test_fraction = test_fraction;
        self
    }

    /// Seed of the train/test shuffle.
    ///
    /// Defaults to `42` if not set.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Number of columns kept by recursive feature elimination.
    ///
    /// Defaults to `3` if not set.
    pub fn n_selected_features(mut self, n_selected_features: usize) -> Self {
        self.0.n_selected_features = n_selected_features;
        self
    }

    /// Defaults to `0.95` if not set.
    pub fn variance_fraction(mut self, variance_fraction: f64) -> Self {
        self.0.variance_fraction = variance_fraction;
        self
    }

    /// Regularization strength shared by the Lasso and the Ridge.
    ///
    /// Defaults to `1` if not set.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Defaults to `2` if not set.
    pub fn polynomial_degree(mut self, polynomial_degree: usize) -> Self {
        self.0.polynomial_degree = polynomial_degree;
        self
    }

    /// Defaults to `3` if not set.
    pub fn spline_degree(mut self, spline_degree: usize) -> Self {
        self.0.spline_degree = spline_degree;
        self
    }

    /// Defaults to `5` if not set.
    pub fn spline_n_knots(mut self, spline_n_knots: usize) -> Self {
        self.0.spline_n_knots = spline_n_knots;
        self
    }

    /// Defaults to `5` if not set.
    pub fn cv_folds(mut self, cv_folds: usize) -> Self {
        self.0.cv_folds = cv_folds;
        self
    }

    /// Epoch cap of the coordinate descent solvers.
    ///
    /// Defaults to `20000` if not set.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Defaults to `1e-4` if not set.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Predictor of the simple regime.
    ///
    /// Defaults to the first feature column of the table if not set.
    pub fn simple_feature(mut self, name: &str) -> Self {
        self.0.simple_feature = Some(name.to_string());
        self
    }

    /// Checks the configuration and runs every regime on `table`.
    pub fn run(&self, table: &Table) -> Result<ComparisonReport> {
        Ok(self.check_ref()?.run(table))
    }

    /// Loads the table from `provider`, then behaves as [`ComparisonParams::run`].
    pub fn run_with_provider<P: DatasetProvider>(
        &self,
        provider: &P,
    ) -> std::result::Result<ComparisonReport, DatasetError> {
        let params = self.check_ref()?;
        let table = provider.load()?;
        Ok(params.run(&table))
    }
}

impl ParamGuard for ComparisonParams {
    type Checked = ComparisonValidParams;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let p = &self.0;
        if !(p.test_fraction > 0. && p.test_fraction < 1.) {
            Err(EstimatorError::InvalidTestFraction(p.test_fraction as f32))
        } else if !(p.variance_fraction > 0. && p.variance_fraction <= 1.) {
            Err(EstimatorError::InvalidVarianceFraction(
                p.variance_fraction as f32,
            ))
        } else if p.n_selected_features == 0 {
            Err(EstimatorError::InvalidFeatureCount {
                requested: 0,
                available: 0,
            })
        } else if p.cv_folds < 2 {
            Err(EstimatorError::InvalidFolds {
                n_folds: p.cv_folds,
                n_samples: 0,
            })
        } else {
            // The variant hyperparameters are validated by their own guards.
            for variant in self.0.variants() {
                match variant {
                    Variant::Linear(params) => params.check_ref().map(|_| ())?,
                    Variant::Lasso(params) => params.check_ref().map(|_| ())?,
                    Variant::Ridge(params) => params.check_ref().map(|_| ())?,
                    Variant::Polynomial(params) => params.check_ref().map(|_| ())?,
                    Variant::Spline(params) => params.check_ref().map(|_| ())?,
                }
            }
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
