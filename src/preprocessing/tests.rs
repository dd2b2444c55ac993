use ndarray::{array, Array2, Axis};

use super::*;
use crate::estimators::error::EstimatorError;
use crate::helpers::test_helpers::{assert_array2d_all_close, assert_array_all_close};

#[test]
fn test_scaler_uses_training_statistics() {
    let train = array![[1., 10.], [3., 10.]];
    let scaler = StandardScaler::fit(train.view()).unwrap();

    assert_array_all_close(scaler.mean(), array![2., 10.].view(), 1e-12);
    // Constant columns are centred only.
    assert_array_all_close(scaler.scale(), array![1., 1.].view(), 1e-12);

    let test = array![[5., 12.]];
    let transformed = scaler.transform(test.view()).unwrap();
    assert_array2d_all_close(transformed.view(), array![[3., 2.]].view(), 1e-12);
}

#[test]
fn test_scaler_zero_mean_unit_variance() {
    let x = array![[1., -2.], [2., 0.], [3., 5.], [6., 1.]];
    let scaler = StandardScaler::fit(x.view()).unwrap();
    let z = scaler.transform(x.view()).unwrap();

    let mean = z.mean_axis(Axis(0)).unwrap();
    let var = z.var_axis(Axis(0), 0.);
    assert_array_all_close(mean.view(), array![0., 0.].view(), 1e-12);
    assert_array_all_close(var.view(), array![1., 1.].view(), 1e-12);
}

#[test]
fn test_scaler_rejects_wrong_width() {
    let scaler = StandardScaler::fit(array![[1., 2.], [3., 4.]].view()).unwrap();
    let err = scaler.transform(array![[1., 2., 3.]].view()).unwrap_err();
    assert_eq!(
        err,
        EstimatorError::DimensionMismatch {
            what: "number of features",
            expected: 2,
            actual: 3
        }
    );
}

#[test]
fn test_polynomial_terms() {
    let poly = PolynomialFeatures::new(2, 2).unwrap();
    assert_eq!(poly.n_output_features(), 5);
    assert_eq!(
        poly.monomials(),
        &[vec![0], vec![1], vec![0, 0], vec![0, 1], vec![1, 1]]
    );

    let x = array![[2., 3.], [-1., 0.5]];
    let expanded = poly.transform(x.view()).unwrap();
    let expected = array![[2., 3., 4., 6., 9.], [-1., 0.5, 1., -0.5, 0.25]];
    assert_array2d_all_close(expanded.view(), expected.view(), 1e-12);
}

#[test]
fn test_polynomial_column_count() {
    // C(n + d, d) - 1 monomials without the constant term.
    assert_eq!(PolynomialFeatures::new(3, 3).unwrap().n_output_features(), 19);
    assert_eq!(PolynomialFeatures::new(4, 1).unwrap().n_output_features(), 4);
    assert_eq!(PolynomialFeatures::new(1, 4).unwrap().n_output_features(), 4);
}

#[test]
fn test_polynomial_invalid() {
    assert_eq!(
        PolynomialFeatures::new(2, 0).unwrap_err(),
        EstimatorError::InvalidDegree(0)
    );
    assert_eq!(
        PolynomialFeatures::new(0, 2).unwrap_err(),
        EstimatorError::EmptyFeatureSet
    );

    let poly = PolynomialFeatures::new(2, 2).unwrap();
    let err = poly.transform(array![[1.]].view()).unwrap_err();
    assert!(matches!(err, EstimatorError::DimensionMismatch { .. }));
}

fn linspace_column(n: usize, low: f64, high: f64) -> Array2<f64> {
    Array2::from_shape_fn((n, 1), |(i, _)| {
        low + (high - low) * i as f64 / (n - 1) as f64
    })
}

#[test]
fn test_spline_partition_of_unity() {
    let x = linspace_column(41, 0., 10.);
    let spline = SplineTransformer::fit(x.view(), 3, 5).unwrap();

    assert_eq!(spline.n_basis_per_feature(), 7);
    assert_eq!(spline.n_output_features(), 7);

    let basis = spline.transform(x.view()).unwrap();
    assert_eq!(basis.dim(), (41, 7));
    for row in basis.rows() {
        assert!(row.iter().all(|&b| b >= -1e-12));
        assert!((row.sum() - 1.).abs() < 1e-9);
    }
}

#[test]
fn test_spline_clamps_out_of_range() {
    let x = linspace_column(11, -1., 1.);
    let spline = SplineTransformer::fit(x.view(), 2, 4).unwrap();

    let inside = spline.transform(array![[-1.], [1.]].view()).unwrap();
    let outside = spline.transform(array![[-7.], [3.]].view()).unwrap();
    assert_array2d_all_close(outside.view(), inside.view(), 1e-12);
}

#[test]
fn test_spline_multiple_features() {
    let x = array![[0., 5.], [1., 6.], [2., 8.], [3., 9.]];
    let spline = SplineTransformer::fit(x.view(), 3, 5).unwrap();
    let basis = spline.transform(x.view()).unwrap();

    assert_eq!(basis.ncols(), 14);
    for row in basis.rows() {
        assert!(f64::abs(row.sum() - 2.) < 1e-9);
    }
}

#[test]
fn test_spline_constant_feature() {
    let x = array![[4.], [4.], [4.]];
    let spline = SplineTransformer::fit(x.view(), 3, 5).unwrap();
    let basis = spline.transform(x.view()).unwrap();
    for row in basis.rows() {
        assert!(f64::abs(row.sum() - 1.) < 1e-9);
    }
}

#[test]
fn test_spline_invalid() {
    let x = linspace_column(5, 0., 1.);
    assert_eq!(
        SplineTransformer::fit(x.view(), 0, 5).unwrap_err(),
        EstimatorError::InvalidDegree(0)
    );
    assert_eq!(
        SplineTransformer::fit(x.view(), 3, 1).unwrap_err(),
        EstimatorError::InvalidKnots(1)
    );
    let empty = Array2::<f64>::zeros((0, 1));
    assert_eq!(
        SplineTransformer::fit(empty.view(), 3, 5).unwrap_err(),
        EstimatorError::EmptyDataset
    );
}

#[test]
fn test_scaler_reports_overflowing_variance() {
    let x = array![[1e200, 1.], [-2e200, 2.], [3e200, 3.]];
    assert_eq!(
        StandardScaler::fit(x.view()).unwrap_err(),
        EstimatorError::NonFiniteResult("standardization")
    );
}
