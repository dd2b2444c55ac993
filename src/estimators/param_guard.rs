use super::traits::Fit;
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use std::error::Error;

/// Hyperparameters that must be validated before use.
///
/// Builders such as [`crate::estimators::LassoParams`] wrap an unchecked
/// `*ValidParams` value. Only `check_ref` and `check` hand it out, so every
/// fit, selection or comparison runs on validated settings. Both methods
/// apply the same rules.
pub trait ParamGuard {
    /// The validated hyperparameters
    type Checked;
    /// Error raised by an invalid setting
    type Error: Error;

    /// Borrows the validated hyperparameters.
    fn check_ref(&self) -> Result<&Self::Checked, Self::Error>;

    /// Consumes the builder into the validated hyperparameters.
    fn check(self) -> Result<Self::Checked, Self::Error>;
}

/// Any builder whose validated form can be fitted can be fitted directly: the
/// settings are checked first and a failed check is returned as the fitting
/// error.
impl<DM: DesignMatrix, T: Targets, E, P: ParamGuard> Fit<DM, T, E> for P
where
    P::Checked: Fit<DM, T, E>,
    E: Error + From<P::Error>,
{
    type Object = <<P as ParamGuard>::Checked as Fit<DM, T, E>>::Object;

    fn fit(&self, dataset: &DatasetBase<DM, T>) -> Result<Self::Object, E> {
        let checked = self.check_ref()?;
        checked.fit(dataset)
    }
}
