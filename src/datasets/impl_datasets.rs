use super::{DatasetBase, DatasetView, DesignMatrix, Targets};
use crate::estimators::error::{EstimatorError, Result};
use ndarray::{ArrayBase, Axis, Data, Ix1, Ix2};

/// This implements the [`DesignMatrix`] trait for dense matrices.
impl<F, S: Data<Elem = F>> DesignMatrix for ArrayBase<S, Ix2> {
    type Elem = F;

    fn n_samples(&self) -> usize {
        self.len_of(Axis(0))
    }

    fn n_features(&self) -> usize {
        self.len_of(Axis(1))
    }
}

impl<F, S: Data<Elem = F>> Targets for ArrayBase<S, Ix1> {
    type Elem = F;

    fn n_samples(&self) -> usize {
        self.len_of(Axis(0))
    }
}

/// This implementation block provides a method for the creation of datasets
/// from dense matrices.
impl<DM: DesignMatrix, T: Targets> From<(DM, T)> for DatasetBase<DM, T> {
    fn from(data: (DM, T)) -> Self {
        DatasetBase {
            design_matrix: data.0,
            targets: data.1,
        }
    }
}

/// This implementation block provides methods to get record and target objects
/// from the dataset.
impl<DM: DesignMatrix, T: Targets> DatasetBase<DM, T> {
    /// This method instantiates a new dataset from a design matrix and targets.
    pub fn new(design_matrix: DM, targets: T) -> DatasetBase<DM, T> {
        DatasetBase {
            design_matrix,
            targets,
        }
    }

    /// This method is a getter for the targets.
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// This method is a getter for the design matrix.
    pub fn design_matrix(&self) -> &DM {
        &self.design_matrix
    }

    pub fn n_samples(&self) -> usize {
        self.design_matrix.n_samples()
    }

    pub fn n_features(&self) -> usize {
        self.design_matrix.n_features()
    }

    /// Fails when the design matrix and the targets disagree on the number of
    /// samples, or when there is nothing to fit.
    pub fn check_consistency(&self) -> Result<()> {
        let n_samples = self.design_matrix.n_samples();
        if self.targets.n_samples() != n_samples {
            return Err(EstimatorError::DimensionMismatch {
                what: "number of targets",
                expected: n_samples,
                actual: self.targets.n_samples(),
            });
        }
        if n_samples == 0 {
            return Err(EstimatorError::EmptyDataset);
        }
        if self.design_matrix.n_features() == 0 {
            return Err(EstimatorError::EmptyFeatureSet);
        }
        Ok(())
    }
}

impl<F, S: Data<Elem = F>, T: Data<Elem = F>> DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>> {
    /// Borrows the dataset as a [`DatasetView`].
    pub fn view(&self) -> DatasetView<'_, F> {
        DatasetBase {
            design_matrix: self.design_matrix.view(),
            targets: self.targets.view(),
        }
    }
}
