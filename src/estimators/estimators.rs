use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2};

use super::error::{EstimatorError, Result};
use super::hyperparams::{
    LassoParams, LassoValidParams, LinearRegressionParams, LinearRegressionValidParams,
    PolynomialRegressionValidParams, RidgeParams, RidgeValidParams, SplineRegressionValidParams,
};
use super::param_guard::ParamGuard;
use super::traits::{Fit, Predict};

use crate::cd::{coordinate_descent, Solution};
use crate::datafits::Quadratic;
use crate::datasets::{DatasetBase, DatasetView};
use crate::helpers::linalg::solve_least_squares;
use crate::penalties::{L1, L2};
use crate::preprocessing::{check_n_features, PolynomialFeatures, SplineTransformer, StandardScaler};
use crate::Float;

/// The ordinary least squares estimator
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression<F> {
    coefficients: Array1<F>,
    intercept: F,
}

impl<F: Float> LinearRegression<F> {
    /// This method is a getter for the coefficients vector.
    pub fn coefficients(&self) -> ArrayView1<F> {
        self.coefficients.view()
    }

    pub fn intercept(&self) -> F {
        self.intercept
    }
}

impl<F: Float> Predict<F> for LinearRegression<F> {
    fn predict(&self, records: ArrayView2<F>) -> Result<Array1<F>> {
        linear_predict(records, self.coefficients.view(), self.intercept)
    }
}

/// Fits an ordinary least squares model on a dense design matrix. The
/// intercept is recovered from the column means so that it stays unpenalized.
impl<F: Float, S: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, EstimatorError> for LinearRegressionValidParams
{
    type Object = LinearRegression<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        dataset.check_consistency()?;
        let X = dataset.design_matrix().view();
        let y = dataset.targets().view();

        if !self.fit_intercept() {
            let coefficients = solve_least_squares(X, y)?;
            return Ok(LinearRegression {
                coefficients,
                intercept: F::zero(),
            });
        }

        let (Xc, x_mean) = center_columns(X)?;
        let y_mean = y.mean().ok_or(EstimatorError::EmptyDataset)?;
        let yc = y.mapv(|v| v - y_mean);

        let coefficients = solve_least_squares(Xc.view(), yc.view())?;
        let intercept = y_mean - x_mean.dot(&coefficients);
        Ok(LinearRegression {
            coefficients,
            intercept,
        })
    }
}

/// The Lasso estimator
///
/// The Lasso estimator solves a regularized least-square regression problem.
/// The L1-regularization used yields sparse solutions. Features are
/// standardized with the statistics of the training records before the
/// descent, the reported coefficients are expressed on the original scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Lasso<F> {
    coefficients: Array1<F>,
    intercept: F,
    n_epochs: usize,
    converged: bool,
}

impl<F: Float> Lasso<F> {
    /// This method instantiates a Lasso estimator with default parameters
    /// for the coordinate descent solver.
    pub fn params() -> LassoParams<F> {
        LassoParams::new()
    }

    /// This method is a getter for the coefficients vector.
    pub fn coefficients(&self) -> ArrayView1<F> {
        self.coefficients.view()
    }

    pub fn intercept(&self) -> F {
        self.intercept
    }

    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    /// Whether the solver met its tolerance within the epoch budget.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl<F: Float> Predict<F> for Lasso<F> {
    fn predict(&self, records: ArrayView2<F>) -> Result<Array1<F>> {
        linear_predict(records, self.coefficients.view(), self.intercept)
    }
}

/// This implements the coordinate descent optimization procedure for dense
/// design matrices.
impl<F: Float, S: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, EstimatorError> for LassoValidParams<F>
{
    /// If successful, the output of the coordinate descent solver is an instance
    /// of [`Lasso`] containing the fitted coefficients.
    type Object = Lasso<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        dataset.check_consistency()?;
        let penalty = L1::new(self.alpha());

        let fitted = fit_standardized(
            dataset.design_matrix().view(),
            dataset.targets().view(),
            |standardized| {
                let mut datafit = Quadratic::new();
                coordinate_descent(
                    standardized,
                    &mut datafit,
                    &penalty,
                    self.max_iterations(),
                    self.tolerance(),
                    self.K(),
                    self.use_acceleration(),
                )
            },
        )?;

        Ok(Lasso {
            coefficients: fitted.coefficients,
            intercept: fitted.intercept,
            n_epochs: fitted.n_epochs,
            converged: fitted.converged,
        })
    }
}

/// The Ridge estimator
///
/// Least squares with a squared L2 penalty, solved by coordinate descent on
/// standardized features. Coefficients are shrunk but never zeroed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ridge<F> {
    coefficients: Array1<F>,
    intercept: F,
    n_epochs: usize,
    converged: bool,
}

impl<F: Float> Ridge<F> {
    pub fn params() -> RidgeParams<F> {
        RidgeParams::new()
    }

    pub fn coefficients(&self) -> ArrayView1<F> {
        self.coefficients.view()
    }

    pub fn intercept(&self) -> F {
        self.intercept
    }

    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl<F: Float> Predict<F> for Ridge<F> {
    fn predict(&self, records: ArrayView2<F>) -> Result<Array1<F>> {
        linear_predict(records, self.coefficients.view(), self.intercept)
    }
}

impl<F: Float, S: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, EstimatorError> for RidgeValidParams<F>
{
    type Object = Ridge<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        dataset.check_consistency()?;
        // The datafit is averaged over the samples while the penalty is not.
        let penalty = L2::new(self.alpha() / F::cast(dataset.n_samples()));

        let fitted = fit_standardized(
            dataset.design_matrix().view(),
            dataset.targets().view(),
            |standardized| {
                let mut datafit = Quadratic::new();
                coordinate_descent(
                    standardized,
                    &mut datafit,
                    &penalty,
                    self.max_iterations(),
                    self.tolerance(),
                    self.K(),
                    self.use_acceleration(),
                )
            },
        )?;

        Ok(Ridge {
            coefficients: fitted.coefficients,
            intercept: fitted.intercept,
            n_epochs: fitted.n_epochs,
            converged: fitted.converged,
        })
    }
}

/// Polynomial regressor
///
/// Ordinary least squares on the polynomial expansion of the features.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialRegression<F> {
    features: PolynomialFeatures,
    linear: LinearRegression<F>,
}

impl<F: Float> PolynomialRegression<F> {
    pub fn expansion(&self) -> &PolynomialFeatures {
        &self.features
    }

    /// Coefficients of the expanded features, in the order of
    /// [`PolynomialFeatures::monomials`].
    pub fn coefficients(&self) -> ArrayView1<F> {
        self.linear.coefficients()
    }

    pub fn intercept(&self) -> F {
        self.linear.intercept()
    }
}

impl<F: Float> Predict<F> for PolynomialRegression<F> {
    fn predict(&self, records: ArrayView2<F>) -> Result<Array1<F>> {
        let expanded = self.features.transform(records)?;
        self.linear.predict(expanded.view())
    }
}

impl<F: Float, S: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, EstimatorError> for PolynomialRegressionValidParams
{
    type Object = PolynomialRegression<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        dataset.check_consistency()?;
        let features = PolynomialFeatures::new(dataset.n_features(), self.degree())?;
        let expanded = features.transform(dataset.design_matrix().view())?;
        log::debug!(
            "polynomial expansion of degree {}: {} -> {} features",
            self.degree(),
            dataset.n_features(),
            features.n_output_features()
        );

        let linear = fit_ordinary(expanded.view(), dataset.targets().view())?;
        Ok(PolynomialRegression { features, linear })
    }
}

/// Spline regressor
///
/// Ordinary least squares on a B-spline basis built independently for each
/// feature, so the fitted function is additive across features.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineRegression<F> {
    transformer: SplineTransformer<F>,
    linear: LinearRegression<F>,
}

impl<F: Float> SplineRegression<F> {
    pub fn transformer(&self) -> &SplineTransformer<F> {
        &self.transformer
    }

    pub fn coefficients(&self) -> ArrayView1<F> {
        self.linear.coefficients()
    }

    pub fn intercept(&self) -> F {
        self.linear.intercept()
    }
}

impl<F: Float> Predict<F> for SplineRegression<F> {
    fn predict(&self, records: ArrayView2<F>) -> Result<Array1<F>> {
        let basis = self.transformer.transform(records)?;
        self.linear.predict(basis.view())
    }
}

impl<F: Float, S: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, EstimatorError> for SplineRegressionValidParams
{
    type Object = SplineRegression<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        dataset.check_consistency()?;
        let transformer =
            SplineTransformer::fit(dataset.design_matrix().view(), self.degree(), self.n_knots())?;
        let basis = transformer.transform(dataset.design_matrix().view())?;
        log::debug!(
            "spline basis of degree {} with {} knots: {} -> {} features",
            self.degree(),
            self.n_knots(),
            dataset.n_features(),
            transformer.n_output_features()
        );

        // The basis of every feature sums to one, the Gram matrix is singular
        // once centred and the pseudo-inverse picks the minimum-norm solution.
        let linear = fit_ordinary(basis.view(), dataset.targets().view())?;
        Ok(SplineRegression {
            transformer,
            linear,
        })
    }
}

fn fit_ordinary<F: Float>(X: ArrayView2<F>, y: ArrayView1<F>) -> Result<LinearRegression<F>> {
    LinearRegressionParams::new()
        .check()?
        .fit(&DatasetBase::new(X, y))
}

fn linear_predict<F: Float>(
    records: ArrayView2<F>,
    coefficients: ArrayView1<F>,
    intercept: F,
) -> Result<Array1<F>> {
    check_n_features(coefficients.len(), records.ncols())?;
    Ok(records.dot(&coefficients) + intercept)
}

fn center_columns<F: Float>(X: ArrayView2<F>) -> Result<(Array2<F>, Array1<F>)> {
    let mean = X.mean_axis(Axis(0)).ok_or(EstimatorError::EmptyDataset)?;
    Ok((&X - &mean, mean))
}

struct StandardizedFit<F> {
    coefficients: Array1<F>,
    intercept: F,
    n_epochs: usize,
    converged: bool,
}

/// Runs `solve` on standardized features and centred targets, then maps the
/// solution back to the original feature scale.
fn fit_standardized<F, Solve>(
    X: ArrayView2<F>,
    y: ArrayView1<F>,
    solve: Solve,
) -> Result<StandardizedFit<F>>
where
    F: Float,
    Solve: FnOnce(&DatasetView<F>) -> Solution<F>,
{
    let scaler = StandardScaler::fit(X)?;
    let Z = scaler.transform(X)?;
    let y_mean = y.mean().ok_or(EstimatorError::EmptyDataset)?;
    let yc = y.mapv(|v| v - y_mean);

    let solution = solve(&DatasetBase::new(Z.view(), yc.view()));

    let coefficients = &solution.coefficients / &scaler.scale();
    let intercept = y_mean - scaler.mean().dot(&coefficients);
    Ok(StandardizedFit {
        coefficients,
        intercept,
        n_epochs: solution.n_epochs,
        converged: solution.converged,
    })
}
