use super::error::{EstimatorError, Result};
use super::param_guard::ParamGuard;
use crate::Float;

/// A verified hyperparameter set ready for the fitting of an ordinary least
/// squares model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearRegressionValidParams {
    fit_intercept: bool,
}

impl LinearRegressionValidParams {
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }
}

/// Configures an ordinary least squares model
///
/// ```ignore
/// 1 / (2 * n_samples) * ||y - Xw - b||^2_2
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearRegressionParams(LinearRegressionValidParams);

impl Default for LinearRegressionParams {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegressionParams {
    pub fn new() -> LinearRegressionParams {
        Self(LinearRegressionValidParams {
            fit_intercept: true,
        })
    }

    /// Whether an unpenalized intercept is estimated alongside the
    /// coefficients.
    /// Defaults to `true` if not set.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.0.fit_intercept = fit_intercept;
        self
    }
}

impl ParamGuard for LinearRegressionParams {
    type Checked = LinearRegressionValidParams;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyperparameter set ready for the fitting of a Lasso regression model
#[derive(Debug, Clone, PartialEq)]
pub struct LassoValidParams<F> {
    alpha: F,
    max_iterations: usize,
    tolerance: F,
    K: usize,
    use_acceleration: bool,
}

impl<F: Float> LassoValidParams<F> {
    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn K(&self) -> usize {
        self.K
    }

    pub fn use_acceleration(&self) -> bool {
        self.use_acceleration
    }
}

/// A hyper-parameter set during construction
///
/// Configures and minimizes the following objective function on
/// standardized features:
/// ```ignore
/// 1 / (2 * n_samples) * ||y - Xw - b||^2_2
///     + alpha * ||w||_1
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LassoParams<F>(LassoValidParams<F>);

impl<F: Float> Default for LassoParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit a Lasso model
impl<F: Float> LassoParams<F> {
    /// Create default Lasso hyper parameters
    pub fn new() -> LassoParams<F> {
        Self(LassoValidParams {
            alpha: F::one(),
            max_iterations: 20000,
            tolerance: F::cast(1e-4),
            K: 5,
            use_acceleration: true,
        })
    }

    /// Set the regularization hyperparameter. A higher value yields sparser
    /// solutions, `0` reduces the model to ordinary least squares.
    /// Defaults to `1` if not set.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Set the maximum number of epochs of the descent routine.
    ///
    /// Defaults to `20000` if not set.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Set the stopping criterion for the optimization routine (KKT violation).
    ///
    /// Defaults to `1e-4` if not set.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the number of points used for extrapolation.
    ///
    /// Defaults to `5` if not set.
    pub fn K(mut self, K: usize) -> Self {
        self.0.K = K;
        self
    }

    /// Enables the use of Anderson acceleration for the extrapolation of
    /// primal iterates.
    /// Defaults to `true` if not set.
    pub fn use_acceleration(mut self, use_acceleration: bool) -> Self {
        self.0.use_acceleration = use_acceleration;
        self
    }
}

impl<F: Float> ParamGuard for LassoParams<F> {
    type Checked = LassoValidParams<F>;
    type Error = EstimatorError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        check_descent_params(
            self.0.alpha,
            self.0.tolerance,
            self.0.K,
            self.0.max_iterations,
        )?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyperparameter set ready for the fitting of a Ridge regression model
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeValidParams<F> {
    alpha: F,
    max_iterations: usize,
    tolerance: F,
    K: usize,
    use_acceleration: bool,
}

impl<F: Float> RidgeValidParams<F> {
    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn K(&self) -> usize {
        self.K
    }

    pub fn use_acceleration(&self) -> bool {
        self.use_acceleration
    }
}

/// A hyper-parameter set during construction
///
/// Configures and minimizes the following objective function on
/// standardized features:
/// ```ignore
/// 1 / (2 * n_samples) * (||y - Xw - b||^2_2 + alpha * ||w||^2_2)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeParams<F>(RidgeValidParams<F>);

impl<F: Float> Default for RidgeParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> RidgeParams<F> {
    pub fn new() -> RidgeParams<F> {
        Self(RidgeValidParams {
            alpha: F::one(),
            max_iterations: 20000,
            tolerance: F::cast(1e-4),
            K: 5,
            use_acceleration: true,
        })
    }

    /// Set the regularization hyperparameter.
    ///
    /// Defaults to `1` if not set.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Defaults to `20000` if not set.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Defaults to `1e-4` if not set.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Defaults to `5` if not set.
    pub fn K(mut self, K: usize) -> Self {
        self.0.K = K;
        self
    }

    /// Defaults to `true` if not set.
    pub fn use_acceleration(mut self, use_acceleration: bool) -> Self {
        self.0.use_acceleration = use_acceleration;
        self
    }
}

impl<F: Float> ParamGuard for RidgeParams<F> {
    type Checked = RidgeValidParams<F>;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_descent_params(
            self.0.alpha,
            self.0.tolerance,
            self.0.K,
            self.0.max_iterations,
        )?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

fn check_descent_params<F: Float>(
    alpha: F,
    tolerance: F,
    K: usize,
    max_iterations: usize,
) -> Result<()> {
    if alpha.is_negative() || !alpha.is_finite() {
        Err(EstimatorError::InvalidRegularization(
            alpha.to_f32().unwrap_or(f32::NAN),
        ))
    } else if tolerance.is_negative() || !tolerance.is_finite() {
        Err(EstimatorError::InvalidTolerance(
            tolerance.to_f32().unwrap_or(f32::NAN),
        ))
    } else if K == 0 {
        Err(EstimatorError::InvalidK(K))
    } else if max_iterations == 0 {
        Err(EstimatorError::InvalidMaxIterations(max_iterations))
    } else {
        Ok(())
    }
}

/// A verified hyperparameter set for a polynomial regression model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialRegressionValidParams {
    degree: usize,
}

impl PolynomialRegressionValidParams {
    pub fn degree(&self) -> usize {
        self.degree
    }
}

/// Ordinary least squares on every monomial of the features up to a total
/// degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialRegressionParams(PolynomialRegressionValidParams);

impl Default for PolynomialRegressionParams {
    fn default() -> Self {
        Self::new()
    }
}

impl PolynomialRegressionParams {
    pub fn new() -> PolynomialRegressionParams {
        Self(PolynomialRegressionValidParams { degree: 2 })
    }

    /// Set the maximal total degree of the expansion.
    ///
    /// Defaults to `2` if not set.
    pub fn degree(mut self, degree: usize) -> Self {
        self.0.degree = degree;
        self
    }
}

impl ParamGuard for PolynomialRegressionParams {
    type Checked = PolynomialRegressionValidParams;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.degree < 1 {
            Err(EstimatorError::InvalidDegree(self.0.degree))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyperparameter set for a spline regression model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplineRegressionValidParams {
    degree: usize,
    n_knots: usize,
}

impl SplineRegressionValidParams {
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn n_knots(&self) -> usize {
        self.n_knots
    }
}

/// Ordinary least squares on a per-feature B-spline basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplineRegressionParams(SplineRegressionValidParams);

impl Default for SplineRegressionParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SplineRegressionParams {
    pub fn new() -> SplineRegressionParams {
        Self(SplineRegressionValidParams {
            degree: 3,
            n_knots: 5,
        })
    }

    /// Set the degree of the B-splines.
    ///
    /// Defaults to `3` if not set.
    pub fn degree(mut self, degree: usize) -> Self {
        self.0.degree = degree;
        self
    }

    /// Set the number of knots spanning the training range of each feature.
    ///
    /// Defaults to `5` if not set.
    pub fn n_knots(mut self, n_knots: usize) -> Self {
        self.0.n_knots = n_knots;
        self
    }
}

impl ParamGuard for SplineRegressionParams {
    type Checked = SplineRegressionValidParams;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.degree < 1 {
            Err(EstimatorError::InvalidDegree(self.0.degree))
        } else if self.0.n_knots < 2 {
            Err(EstimatorError::InvalidKnots(self.0.n_knots))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
