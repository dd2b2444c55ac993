use std::collections::HashSet;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::estimators::error::{EstimatorError, Result};

/// An ordered, non-empty, duplicate-free list of feature column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(EstimatorError::EmptyFeatureSet);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in names.iter() {
            if !seen.insert(name.as_str()) {
                return Err(EstimatorError::DuplicateColumn(name.clone()));
            }
        }
        Ok(FeatureSet(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// An analysis-ready table: named numeric feature columns plus one
/// designated target column.
///
/// Features are stored row-major as an `(n_rows, n_features)` matrix. A table
/// is validated once at construction and is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    feature_names: Vec<String>,
    features: Array2<f64>,
    target_name: String,
    target: Array1<f64>,
}

impl Table {
    /// Builds a table from named columns, one of which is the target.
    pub fn new(columns: Vec<(String, Vec<f64>)>, target: &str) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (name, _) in columns.iter() {
            if !seen.insert(name.as_str()) {
                return Err(EstimatorError::DuplicateColumn(name.clone()));
            }
        }

        let n_rows = columns.first().map_or(0, |(_, values)| values.len());
        for (name, values) in columns.iter() {
            if values.len() != n_rows {
                return Err(EstimatorError::DimensionMismatch {
                    what: "column length",
                    expected: n_rows,
                    actual: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(EstimatorError::NonFiniteValue(name.clone()));
            }
        }
        if n_rows == 0 {
            return Err(EstimatorError::EmptyDataset);
        }

        let mut target_values = None;
        let mut feature_names = Vec::with_capacity(columns.len());
        let mut feature_values = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if name == target {
                target_values = Some(values);
            } else {
                feature_names.push(name);
                feature_values.push(values);
            }
        }
        let target_values =
            target_values.ok_or_else(|| EstimatorError::UnknownColumn(target.to_string()))?;
        if feature_names.is_empty() {
            return Err(EstimatorError::EmptyFeatureSet);
        }

        let n_features = feature_names.len();
        let features = Array2::from_shape_fn((n_rows, n_features), |(i, j)| feature_values[j][i]);

        Ok(Table {
            feature_names,
            features,
            target_name: target.to_string(),
            target: Array1::from_vec(target_values),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Every non-target column, in table order.
    pub fn all_features(&self) -> FeatureSet {
        FeatureSet(self.feature_names.clone())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    /// Fails with [`EstimatorError::UnknownColumn`] for the first name of the
    /// set that is not a feature column of this table.
    pub fn check_features(&self, features: &FeatureSet) -> Result<Vec<usize>> {
        features
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| EstimatorError::UnknownColumn(name.to_string()))
            })
            .collect()
    }

    /// The full feature matrix.
    pub fn records(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Extracts the columns of `features`, in the order of the set.
    pub fn select(&self, features: &FeatureSet) -> Result<Array2<f64>> {
        let indices = self.check_features(features)?;
        Ok(self.features.select(Axis(1), &indices))
    }

    pub fn target(&self) -> ArrayView1<'_, f64> {
        self.target.view()
    }
}
