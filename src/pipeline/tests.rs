use super::*;
use crate::datasets::{InMemoryProvider, Table};
use crate::helpers::test_helpers::{generate_random_data, table_columns};
use crate::ErrorKind;

const VARIANTS: [&str; 5] = [
    "Linear Regression",
    "Lasso Regression",
    "Ridge Regression",
    "Polynomial Regression",
    "Spline Regression",
];

fn housing_table() -> Table {
    let columns = vec![
        ("Estimate".to_string(), vec![1., 2., 3., 4., 5.]),
        ("SalePrice".to_string(), vec![2., 4., 6., 8., 10.]),
    ];
    Table::new(columns, "SalePrice").unwrap()
}

fn random_table(n_samples: usize, n_features: usize) -> Table {
    let (X, y) = generate_random_data(n_samples, n_features);
    Table::new(table_columns(X.view(), y.view(), "target"), "target").unwrap()
}

#[test]
fn test_simple_linear_on_exact_relation() {
    let report = ComparisonParams::new().run(&housing_table()).unwrap();

    let score = report.score("simple/Linear Regression").unwrap().as_ref().unwrap();
    assert!(score.mse < 1e-10);
    assert!(score.converged);

    let folds = report
        .cross_validation("simple/Linear Regression")
        .unwrap()
        .as_ref()
        .unwrap();
    assert_eq!(folds.len(), 5);
    for fold in folds {
        assert!(fold.as_ref().unwrap().mse < 1e-10);
    }
}

#[test]
fn test_every_entry_is_reported() {
    let report = ComparisonParams::new().run(&random_table(60, 5)).unwrap();
    assert_eq!(report.regimes().len(), 3);

    let mut expected = vec!["simple/Linear Regression".to_string()];
    for tag in ["full", "selected", "pca"] {
        for variant in VARIANTS {
            expected.push(format!("{}/{}", tag, variant));
        }
    }

    let keys: Vec<String> = report
        .regimes()
        .iter()
        .flat_map(|r| r.scores.keys().map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert_eq!(keys, expected);

    for key in expected.iter() {
        assert!(report.score(key).unwrap().is_ok(), "{}", key);
        let folds = report.cross_validation(key).unwrap().as_ref().unwrap();
        assert_eq!(folds.len(), 5, "{}", key);
        assert!(folds.iter().all(|f| f.is_ok()), "{}", key);
    }
    for regime in report.regimes() {
        assert_eq!(regime.n_failures(), 0);
    }
}

#[test]
fn test_runs_are_reproducible() {
    let table = random_table(40, 4);
    let first = ComparisonParams::new().seed(7).run(&table).unwrap();
    let second = ComparisonParams::new().seed(7).run(&table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_simple_feature_is_isolated() {
    let report = ComparisonParams::new()
        .simple_feature("Missing")
        .run(&random_table(40, 4))
        .unwrap();

    let failure = report
        .score("simple/Linear Regression")
        .unwrap()
        .as_ref()
        .unwrap_err();
    assert_eq!(failure.regime, Regime::Simple);
    assert_eq!(failure.feature_set, "simple");
    assert_eq!(failure.variant, "Linear Regression");
    assert_eq!(
        failure.error,
        EstimatorError::UnknownColumn("Missing".to_string())
    );
    assert!(report.cross_validation("simple/Linear Regression").unwrap().is_err());

    assert!(report.score("full/Lasso Regression").unwrap().is_ok());
    assert!(report.score("pca/Spline Regression").unwrap().is_ok());
}

#[test]
fn test_selection_failure_only_affects_selected_entries() {
    // Three columns kept out of two available.
    let report = ComparisonParams::new().run(&random_table(30, 2)).unwrap();
    let full = report.regime(Regime::Full).unwrap();

    for variant in VARIANTS {
        assert!(full.scores.get(&format!("full/{}", variant)).unwrap().is_ok());
        let failure = full
            .scores
            .get(&format!("selected/{}", variant))
            .unwrap()
            .as_ref()
            .unwrap_err();
        assert_eq!(
            failure.error,
            EstimatorError::InvalidFeatureCount {
                requested: 3,
                available: 2
            }
        );
    }
    assert_eq!(full.n_failures(), 10);
}

#[test]
fn test_constant_features_fail_reduction_only() {
    let columns = vec![
        ("a".to_string(), vec![1.; 10]),
        ("b".to_string(), vec![2.; 10]),
        ("y".to_string(), (0..10).map(|i| i as f64).collect()),
    ];
    let table = Table::new(columns, "y").unwrap();
    let report = ComparisonParams::new()
        .n_selected_features(1)
        .run(&table)
        .unwrap();

    assert!(report.score("simple/Linear Regression").unwrap().is_ok());
    let reduced = report.regime(Regime::Reduced).unwrap();
    for (_, outcome) in reduced.scores.iter() {
        assert_eq!(
            outcome.as_ref().unwrap_err().error,
            EstimatorError::ZeroVariance
        );
    }
}

#[test]
fn test_too_many_folds_fail_cross_validation_only() {
    let report = ComparisonParams::new()
        .cv_folds(11)
        .run(&random_table(10, 3))
        .unwrap();
    let cv = report.cross_validation("full/Linear Regression").unwrap();
    assert_eq!(
        cv.as_ref().unwrap_err().error,
        EstimatorError::InvalidFolds {
            n_folds: 11,
            n_samples: 10
        }
    );
    assert!(report.score("full/Linear Regression").unwrap().is_ok());
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let table = housing_table();
    assert_eq!(
        ComparisonParams::new().test_fraction(1.5).run(&table),
        Err(EstimatorError::InvalidTestFraction(1.5))
    );
    assert_eq!(
        ComparisonParams::new().alpha(-1.).run(&table),
        Err(EstimatorError::InvalidRegularization(-1.))
    );
    assert!(matches!(
        ComparisonParams::new().cv_folds(1).run(&table),
        Err(EstimatorError::InvalidFolds { .. })
    ));
    assert_eq!(
        ComparisonParams::new().spline_n_knots(1).run(&table),
        Err(EstimatorError::InvalidKnots(1))
    );
}

#[test]
fn test_run_with_provider() {
    let table = random_table(30, 3);
    let provider = InMemoryProvider::new(table.clone());
    let params = ComparisonParams::new();
    assert_eq!(
        params.run_with_provider(&provider).unwrap(),
        params.run(&table).unwrap()
    );
}

#[test]
fn test_report_display() {
    let report = ComparisonParams::new()
        .simple_feature("Missing")
        .run(&random_table(30, 3))
        .unwrap();
    let text = report.to_string();
    assert!(text.contains("== simple =="));
    assert!(text.contains("full/Ridge Regression"));
    assert!(text.contains("unknown column Missing"));
    assert!(text.contains("cv = ["));
}

#[test]
fn test_lasso_scores_carry_convergence() {
    // A weak penalty keeps the solution away from zero, so one epoch cannot
    // reach the tolerance.
    let report = ComparisonParams::new()
        .alpha(1e-3)
        .max_iterations(1)
        .tolerance(1e-14)
        .run(&random_table(40, 4))
        .unwrap();
    let score = report.score("full/Lasso Regression").unwrap().as_ref().unwrap();
    assert!(!score.converged);
    assert!(score.mse.is_finite());

    let line = report
        .to_string()
        .lines()
        .find(|l| l.contains("full/Lasso Regression"))
        .map(str::to_string)
        .unwrap();
    assert!(line.ends_with("(not converged)"), "{}", line);
}

#[test]
fn test_overflowing_column_fails_only_affected_entries() {
    let (mut X, y) = generate_random_data(20, 4);
    X.column_mut(1).mapv_inplace(|x| x * 2e200);
    let table = Table::new(table_columns(X.view(), y.view(), "target"), "target").unwrap();

    let report = ComparisonParams::new().run(&table).unwrap();
    assert_eq!(report.regimes().len(), 3);

    // The single-feature regime never sees the huge column.
    assert!(report.score("simple/Linear Regression").unwrap().is_ok());

    let numerical = |key: &str| {
        let failure = report.score(key).unwrap().as_ref().unwrap_err();
        assert_eq!(failure.error.kind(), ErrorKind::Numerical, "{}", key);
    };
    numerical("full/Linear Regression");
    numerical("full/Lasso Regression");
    for variant in VARIANTS {
        numerical(&format!("pca/{}", variant));
    }
    assert!(report.regime(Regime::Reduced).unwrap().n_failures() >= 5);
}
