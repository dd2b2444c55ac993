use ndarray::{Array2, Axis};

use super::*;
use crate::helpers::test_helpers::{assert_array2d_all_close, generate_random_data};

fn rank_three_records() -> Array2<f64> {
    let (X, _) = generate_random_data(30, 3);
    let mut records = Array2::<f64>::zeros((30, 4));
    records.slice_mut(s![.., ..3]).assign(&X);
    let combined = &X.column(0) + &X.column(1);
    records.column_mut(3).assign(&combined);
    records
}

#[test]
fn test_full_fraction_keeps_rank() {
    let records = rank_three_records();
    let pca = Pca::params().variance_fraction(1.).fit(records.view()).unwrap();
    assert_eq!(pca.n_components(), 3);
    assert!((pca.explained_variance_ratio().sum() - 1.).abs() < 1e-9);
}

#[test]
fn test_partial_fraction_retains_enough_variance() {
    let (X, _) = generate_random_data(50, 5);
    for &fraction in &[0.3, 0.5, 0.8, 0.95] {
        let reduced = reduce(X.view(), fraction).unwrap();
        assert!(reduced.retained_variance() >= fraction);
        assert!(reduced.n_components() <= 5);

        // One component fewer would not be enough.
        let ratios = reduced.explained_variance_ratio();
        let without_last: f64 = ratios.slice(s![..reduced.n_components() - 1]).sum();
        assert!(without_last < fraction);
    }
}

#[test]
fn test_reduction_is_deterministic() {
    let (X, _) = generate_random_data(40, 4);
    let first = reduce(X.view(), 0.95).unwrap();
    let second = reduce(X.view(), 0.95).unwrap();
    assert_eq!(first.n_components(), second.n_components());
    assert_eq!(first.records(), second.records());
}

#[test]
fn test_projection_variances_are_eigenvalues() {
    let (X, _) = generate_random_data(60, 3);
    let pca = Pca::params().variance_fraction(1.).fit(X.view()).unwrap();
    let reduced = pca.transform(X.view()).unwrap();

    let variances = reduced.records().var_axis(Axis(0), 1.);
    for (v, l) in variances.iter().zip(pca.explained_variance().iter()) {
        assert!((v - l).abs() < 1e-9);
    }
    // Components are orthonormal.
    let gram = pca.components().t().dot(&pca.components());
    assert_array2d_all_close(gram.view(), Array2::eye(3).view(), 1e-10);
}

#[test]
fn test_components_have_positive_pivot() {
    let (X, _) = generate_random_data(30, 3);
    let pca = Pca::params().variance_fraction(1.).fit(X.view()).unwrap();
    for column in pca.components().columns() {
        let pivot = column
            .iter()
            .fold(0f64, |best, &x| if x.abs() > best.abs() { x } else { best });
        assert!(pivot > 0.);
    }
}

#[test]
fn test_transform_rejects_wrong_width() {
    let (X, _) = generate_random_data(20, 3);
    let pca = Pca::params().fit(X.view()).unwrap();
    assert!(matches!(
        pca.transform(Array2::zeros((2, 4)).view()),
        Err(EstimatorError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_invalid_inputs() {
    let constant = Array2::from_elem((10, 3), 2.5);
    assert_eq!(
        reduce(constant.view(), 0.95),
        Err(EstimatorError::ZeroVariance)
    );

    let (X, _) = generate_random_data(10, 2);
    assert_eq!(
        reduce(X.view(), 0.),
        Err(EstimatorError::InvalidVarianceFraction(0.))
    );
    assert_eq!(
        reduce(X.view(), 1.5),
        Err(EstimatorError::InvalidVarianceFraction(1.5))
    );
}

#[test]
fn test_overflowing_covariance_is_an_error() {
    let mut records = rank_three_records();
    records.column_mut(1).mapv_inplace(|x| x * 1e200);
    assert_eq!(
        reduce(records.view(), 0.95).unwrap_err(),
        EstimatorError::NonFiniteResult("eigendecomposition")
    );
}
