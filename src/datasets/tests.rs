use ndarray::{array, Array1, Array2};

use crate::datasets::*;
use crate::estimators::error::EstimatorError;

fn housing_columns() -> Vec<(String, Vec<f64>)> {
    vec![
        ("Estimate".to_string(), vec![1., 2., 3.]),
        ("SalePrice".to_string(), vec![2., 4., 6.]),
        ("Rooms".to_string(), vec![3., 5., 4.]),
    ]
}

#[test]
fn test_table_splits_target_from_features() {
    let table = Table::new(housing_columns(), "SalePrice").unwrap();
    assert_eq!(table.n_rows(), 3);
    assert_eq!(table.n_features(), 2);
    assert_eq!(table.feature_names(), &["Estimate".to_string(), "Rooms".to_string()]);
    assert_eq!(table.target(), array![2., 4., 6.].view());
    assert_eq!(table.records(), array![[1., 3.], [2., 5.], [3., 4.]].view());
}

#[test]
fn test_table_select_follows_feature_set_order() {
    let table = Table::new(housing_columns(), "SalePrice").unwrap();
    let features = FeatureSet::new(["Rooms", "Estimate"]).unwrap();
    let x = table.select(&features).unwrap();
    assert_eq!(x, array![[3., 1.], [5., 2.], [4., 3.]]);
}

#[test]
fn test_table_rejects_malformed_columns() {
    let mut columns = housing_columns();
    columns[2].1.pop();
    assert!(matches!(
        Table::new(columns, "SalePrice"),
        Err(EstimatorError::DimensionMismatch { .. })
    ));

    assert_eq!(
        Table::new(housing_columns(), "Price"),
        Err(EstimatorError::UnknownColumn("Price".to_string()))
    );

    let mut columns = housing_columns();
    columns[0].1[1] = f64::NAN;
    assert_eq!(
        Table::new(columns, "SalePrice"),
        Err(EstimatorError::NonFiniteValue("Estimate".to_string()))
    );

    let columns = vec![("SalePrice".to_string(), vec![1., 2.])];
    assert_eq!(
        Table::new(columns, "SalePrice"),
        Err(EstimatorError::EmptyFeatureSet)
    );
}

#[test]
fn test_feature_set_invariants() {
    assert_eq!(
        FeatureSet::new(Vec::<String>::new()),
        Err(EstimatorError::EmptyFeatureSet)
    );
    assert_eq!(
        FeatureSet::new(["a", "a"]),
        Err(EstimatorError::DuplicateColumn("a".to_string()))
    );

    let table = Table::new(housing_columns(), "SalePrice").unwrap();
    let features = FeatureSet::new(["Estimate", "SalePrice"]).unwrap();
    assert_eq!(
        table.select(&features),
        Err(EstimatorError::UnknownColumn("SalePrice".to_string()))
    );
}

#[test]
fn test_dataset_consistency() {
    let X = Array2::<f64>::zeros((3, 2));
    let y = Array1::<f64>::zeros(2);
    let dataset = DatasetBase::from((X, y));
    assert_eq!(dataset.n_samples(), 3);
    assert_eq!(dataset.n_features(), 2);
    assert!(matches!(
        dataset.check_consistency(),
        Err(EstimatorError::DimensionMismatch {
            expected: 3,
            actual: 2,
            ..
        })
    ));
}

#[test]
fn test_csv_provider_reads_numeric_table() {
    let content = "Estimate,SalePrice,Rooms\n1,2,3\n2,4,5\n3,6,4\n";
    let provider = CsvProvider::new("unused.csv", "SalePrice");
    let table = provider.read_from(content.as_bytes()).unwrap();
    assert_eq!(table, Table::new(housing_columns(), "SalePrice").unwrap());
}

#[test]
fn test_csv_provider_reports_bad_cells() {
    let content = "Estimate,SalePrice\n1,2\nfoo,4\n";
    let provider = CsvProvider::new("unused.csv", "SalePrice");
    match provider.read_from(content.as_bytes()) {
        Err(DatasetError::Parse { line, column, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(column, "Estimate");
        }
        other => panic!("expected a parse error, got {:?}", other),
    }

    let err = provider.read_from(content.as_bytes()).unwrap_err();
    assert!(err.to_string().starts_with("line 3, column Estimate"), "{}", err);
}

#[test]
fn test_in_memory_provider_hands_out_the_table() {
    let table = Table::new(housing_columns(), "SalePrice").unwrap();
    let provider = InMemoryProvider::new(table.clone());
    assert_eq!(provider.load().unwrap(), table);
}
