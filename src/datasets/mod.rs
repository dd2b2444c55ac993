use ndarray::{ArrayView1, ArrayView2};

mod impl_datasets;
mod provider;
mod table;

#[cfg(test)]
mod tests;

pub use provider::{CsvProvider, DatasetError, DatasetProvider, InMemoryProvider};
pub use table::{FeatureSet, Table};

/// A design matrix paired with its targets, the unit every estimator is fit
/// on.
pub struct DatasetBase<DM, T>
where
    DM: DesignMatrix,
{
    pub design_matrix: DM,
    pub targets: T,
}

/// Borrowed dense dataset, the form consumed by datafits and solvers.
pub type DatasetView<'a, F> = DatasetBase<ArrayView2<'a, F>, ArrayView1<'a, F>>;

pub trait DesignMatrix: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
    fn n_features(&self) -> usize;
}

pub trait Targets: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
}
