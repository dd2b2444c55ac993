use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::datasets::{FeatureSet, Table};
use crate::estimators::error::{EstimatorError, Result};
use crate::Float;

/// Disjoint train and test row indices covering every row exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Split {
    /// Shuffles `0..n_samples` with a generator seeded by `seed` and holds out
    /// the first `ceil(test_fraction * n_samples)` rows of the permutation.
    pub fn new(n_samples: usize, test_fraction: f64, seed: u64) -> Result<Self> {
        if !(test_fraction > 0. && test_fraction < 1.) {
            return Err(EstimatorError::InvalidTestFraction(test_fraction as f32));
        }
        let n_test = (test_fraction * n_samples as f64).ceil() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(EstimatorError::EmptySplit {
                fraction: test_fraction as f32,
                n_samples,
            });
        }

        let mut permutation: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        permutation.shuffle(&mut rng);

        let mut test = permutation[..n_test].to_vec();
        let mut train = permutation[n_test..].to_vec();
        test.sort_unstable();
        train.sort_unstable();

        log::debug!(
            "split {} rows into {} train and {} test (seed {})",
            n_samples,
            train.len(),
            test.len(),
            seed
        );
        Ok(Split { train, test })
    }

    pub(crate) fn from_indices(train: Vec<usize>, test: Vec<usize>) -> Self {
        Split { train, test }
    }

    pub fn train_indices(&self) -> &[usize] {
        &self.train
    }

    pub fn test_indices(&self) -> &[usize] {
        &self.test
    }

    pub fn n_train(&self) -> usize {
        self.train.len()
    }

    pub fn n_test(&self) -> usize {
        self.test.len()
    }

    pub fn n_samples(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Materializes `(x_train, x_test, y_train, y_test)` by row selection.
    #[allow(clippy::type_complexity)]
    pub fn apply<F: Float>(
        &self,
        x: ArrayView2<F>,
        y: ArrayView1<F>,
    ) -> Result<(Array2<F>, Array2<F>, Array1<F>, Array1<F>)> {
        if x.nrows() != y.len() {
            return Err(EstimatorError::DimensionMismatch {
                what: "number of targets",
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if x.nrows() != self.n_samples() {
            return Err(EstimatorError::DimensionMismatch {
                what: "number of rows",
                expected: self.n_samples(),
                actual: x.nrows(),
            });
        }
        Ok((
            x.select(Axis(0), &self.train),
            x.select(Axis(0), &self.test),
            y.select(Axis(0), &self.train),
            y.select(Axis(0), &self.test),
        ))
    }
}

/// Splits the rows of `table` after checking that every column of `features`
/// belongs to it.
pub fn split(table: &Table, features: &FeatureSet, test_fraction: f64, seed: u64) -> Result<Split> {
    table.check_features(features)?;
    Split::new(table.n_rows(), test_fraction, seed)
}
