use ndarray::{array, Array1, Array2, Axis};

use super::error::EstimatorError;
use super::*;
use crate::datasets::DatasetBase;
use crate::helpers::linalg::solve_lin_sys_by_cholesky;
use crate::helpers::test_helpers::{assert_array_all_close, generate_random_data};
use crate::preprocessing::StandardScaler;
use crate::{ErrorKind, Fit, ParamGuard, Predict};

#[test]
fn test_ols_recovers_exact_relation() {
    let (X, _) = generate_random_data(30, 3);
    let w = array![1.5, -2., 0.25];
    let y = X.dot(&w) + 2.5;
    let dataset = DatasetBase::from((X.view(), y.view()));

    let model = LinearRegressionParams::new().fit(&dataset).unwrap();
    assert_array_all_close(model.coefficients(), w.view(), 1e-8);
    assert!((model.intercept() - 2.5).abs() < 1e-8);

    let pred = model.predict(X.view()).unwrap();
    assert_array_all_close(pred.view(), y.view(), 1e-8);
}

#[test]
fn test_ols_without_intercept() {
    let X = array![[1.], [2.], [3.]];
    let y = array![2., 4., 6.];
    let model = LinearRegressionParams::new()
        .fit_intercept(false)
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();
    assert_array_all_close(model.coefficients(), array![2.].view(), 1e-12);
    assert_eq!(model.intercept(), 0.);
}

#[test]
fn test_predict_rejects_wrong_width() {
    let (X, y) = generate_random_data(10, 3);
    let model = LinearRegressionParams::new()
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();
    let err = model.predict(Array2::<f64>::zeros((2, 4)).view()).unwrap_err();
    assert_eq!(
        err,
        EstimatorError::DimensionMismatch {
            what: "number of features",
            expected: 3,
            actual: 4
        }
    );
}

#[test]
fn test_fit_rejects_inconsistent_dataset() {
    let X = Array2::<f64>::zeros((5, 2));
    let y = Array1::<f64>::zeros(4);
    let err = LinearRegressionParams::new()
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);

    let err = Lasso::params()
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
}

#[test]
fn test_lasso_without_regularization_matches_ols() {
    let (X, y) = generate_random_data(50, 5);
    let dataset = DatasetBase::new(X.view(), y.view());

    let ols = LinearRegressionParams::new().fit(&dataset).unwrap();
    let lasso = Lasso::params()
        .alpha(0.)
        .tolerance(1e-8)
        .fit(&dataset)
        .unwrap();

    assert!(lasso.converged());
    assert_array_all_close(lasso.coefficients(), ols.coefficients(), 1e-5);
    assert!((lasso.intercept() - ols.intercept()).abs() < 1e-5);

    let p_ols = ols.predict(X.view()).unwrap();
    let p_lasso = lasso.predict(X.view()).unwrap();
    assert_array_all_close(p_lasso.view(), p_ols.view(), 1e-4);
}

#[test]
fn test_lasso_null_weights_for_large_alpha() {
    let (X, y) = generate_random_data(20, 4);
    let lasso = Lasso::params()
        .alpha(1e3)
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();

    assert!(lasso.converged());
    assert_array_all_close(lasso.coefficients(), Array1::zeros(4).view(), 1e-12);
    assert!((lasso.intercept() - y.mean().unwrap()).abs() < 1e-12);
}

#[test]
fn test_ridge_matches_closed_form() {
    let (X, y) = generate_random_data(40, 4);
    let alpha = 3.;
    let ridge = Ridge::params()
        .alpha(alpha)
        .tolerance(1e-10)
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();
    assert!(ridge.converged());

    // (Z^T Z + alpha I) w = Z^T (y - mean(y)) on standardized features.
    let scaler = StandardScaler::fit(X.view()).unwrap();
    let Z = scaler.transform(X.view()).unwrap();
    let yc = &y - y.mean().unwrap();
    let A = Z.t().dot(&Z) + Array2::<f64>::eye(4) * alpha;
    let w_std = solve_lin_sys_by_cholesky(A.view(), Z.t().dot(&yc).view()).unwrap();
    let expected = &w_std / &scaler.scale();

    assert_array_all_close(ridge.coefficients(), expected.view(), 1e-6);
}

#[test]
fn test_ridge_shrinks_with_alpha() {
    let (X, y) = generate_random_data(40, 4);
    let dataset = DatasetBase::new(X.view(), y.view());
    let weak = Ridge::params().alpha(0.1).fit(&dataset).unwrap();
    let strong = Ridge::params().alpha(100.).fit(&dataset).unwrap();

    let norm = |w: ndarray::ArrayView1<f64>| w.dot(&w);
    assert!(norm(strong.coefficients()) < norm(weak.coefficients()));
}

#[test]
fn test_regularized_invalid_params() {
    assert_eq!(
        Lasso::<f64>::params().alpha(-1.).check().unwrap_err(),
        EstimatorError::InvalidRegularization(-1.)
    );
    assert_eq!(
        Lasso::<f64>::params().tolerance(-1e-3).check().unwrap_err(),
        EstimatorError::InvalidTolerance(-1e-3)
    );
    assert_eq!(
        Ridge::<f64>::params().K(0).check().unwrap_err(),
        EstimatorError::InvalidK(0)
    );
    assert_eq!(
        Ridge::<f64>::params().max_iterations(0).check().unwrap_err(),
        EstimatorError::InvalidMaxIterations(0)
    );
    assert!(Ridge::<f64>::params().alpha(0.).check().is_ok());
}

#[test]
fn test_non_convergence_is_reported() {
    let (X, y) = generate_random_data(30, 6);
    let lasso = Lasso::params()
        .alpha(0.01)
        .max_iterations(1)
        .tolerance(1e-14)
        .use_acceleration(false)
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();
    assert!(!lasso.converged());
    assert_eq!(lasso.n_epochs(), 1);
}

#[test]
fn test_polynomial_recovers_quadratic() {
    let (X, _) = generate_random_data(30, 2);
    let y = X.map_axis(Axis(1), |row| {
        1. + row[0] + 2. * row[0] * row[0] - row[0] * row[1]
    });
    let model = PolynomialRegressionParams::new()
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();

    assert_eq!(model.expansion().n_output_features(), 5);
    assert_array_all_close(
        model.coefficients(),
        array![1., 0., 2., -1., 0.].view(),
        1e-8,
    );
    assert!((model.intercept() - 1.).abs() < 1e-8);
}

#[test]
fn test_polynomial_invalid_degree() {
    let (X, y) = generate_random_data(10, 2);
    let err = PolynomialRegressionParams::new()
        .degree(0)
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap_err();
    assert_eq!(err, EstimatorError::InvalidDegree(0));
}

#[test]
fn test_spline_reproduces_linear_function() {
    let X = Array2::from_shape_fn((25, 1), |(i, _)| i as f64 * 0.25);
    let y = X.column(0).mapv(|x| 3. * x + 1.);
    let model = SplineRegressionParams::new()
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap();

    assert_eq!(model.transformer().n_output_features(), 7);
    let pred = model.predict(X.view()).unwrap();
    assert_array_all_close(pred.view(), y.view(), 1e-6);
}

#[test]
fn test_spline_beats_linear_on_curved_target() {
    let X = Array2::from_shape_fn((60, 1), |(i, _)| i as f64 * 0.1);
    let y = X.column(0).mapv(f64::sin);
    let dataset = DatasetBase::new(X.view(), y.view());

    let mse = |pred: Array1<f64>| {
        let r = &pred - &y;
        r.dot(&r) / y.len() as f64
    };
    let linear = LinearRegressionParams::new().fit(&dataset).unwrap();
    let spline = SplineRegressionParams::new().fit(&dataset).unwrap();

    let linear_mse = mse(linear.predict(X.view()).unwrap());
    let spline_mse = mse(spline.predict(X.view()).unwrap());
    assert!(spline_mse < linear_mse);
    assert!(spline_mse < 1e-2);
}

#[test]
fn test_spline_invalid_knots() {
    let (X, y) = generate_random_data(10, 1);
    let err = SplineRegressionParams::new()
        .n_knots(1)
        .fit(&DatasetBase::new(X.view(), y.view()))
        .unwrap_err();
    assert_eq!(err, EstimatorError::InvalidKnots(1));
}
