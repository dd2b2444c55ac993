//! Principal component analysis.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::estimators::error::{EstimatorError, Result};
use crate::estimators::param_guard::ParamGuard;
use crate::helpers::linalg::{rank_tolerance, symmetric_eigen};
use crate::preprocessing::check_n_features;
use crate::Float;

#[cfg(test)]
mod tests;

/// A verified hyperparameter set for a principal component analysis
#[derive(Debug, Clone, PartialEq)]
pub struct PcaValidParams<F> {
    variance_fraction: F,
}

impl<F: Float> PcaValidParams<F> {
    pub fn variance_fraction(&self) -> F {
        self.variance_fraction
    }
}

/// Configures how many principal directions are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct PcaParams<F>(PcaValidParams<F>);

impl<F: Float> Default for PcaParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> PcaParams<F> {
    pub fn new() -> PcaParams<F> {
        Self(PcaValidParams {
            variance_fraction: F::cast(0.95),
        })
    }

    /// Set the share of the total variance the kept components must explain.
    /// `1` keeps as many components as the rank of the centred records.
    /// Defaults to `0.95` if not set.
    pub fn variance_fraction(mut self, variance_fraction: F) -> Self {
        self.0.variance_fraction = variance_fraction;
        self
    }

    /// Fits the projection on `records`.
    pub fn fit(&self, records: ArrayView2<F>) -> Result<Pca<F>> {
        let params = self.check_ref()?;
        Pca::fit_with(params, records)
    }
}

impl<F: Float> ParamGuard for PcaParams<F> {
    type Checked = PcaValidParams<F>;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let f = self.0.variance_fraction;
        if f > F::zero() && f <= F::one() {
            Ok(&self.0)
        } else {
            Err(EstimatorError::InvalidVarianceFraction(
                f.to_f32().unwrap_or(f32::NAN),
            ))
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A fitted principal component projection
///
/// The covariance `Xc^T Xc / (n - 1)` of the centred records is diagonalized
/// with the cyclic Jacobi method, so fitting twice on the same records gives
/// bit-identical components.
#[derive(Debug, Clone, PartialEq)]
pub struct Pca<F> {
    mean: Array1<F>,
    components: Array2<F>,
    explained_variance: Array1<F>,
    explained_variance_ratio: Array1<F>,
    variance_fraction: F,
}

impl<F: Float> Pca<F> {
    pub fn params() -> PcaParams<F> {
        PcaParams::new()
    }

    fn fit_with(params: &PcaValidParams<F>, records: ArrayView2<F>) -> Result<Self> {
        let (n_samples, n_features) = records.dim();
        if n_samples == 0 {
            return Err(EstimatorError::EmptyDataset);
        }
        if n_features == 0 {
            return Err(EstimatorError::EmptyFeatureSet);
        }
        if n_samples < 2 {
            return Err(EstimatorError::ZeroVariance);
        }

        let mean = records
            .mean_axis(Axis(0))
            .ok_or(EstimatorError::EmptyDataset)?;
        let centred = &records - &mean;
        let covariance = centred.t().dot(&centred) / F::cast(n_samples - 1);

        let (mut eigenvalues, eigenvectors) = symmetric_eigen(covariance.view())?;
        let tol = rank_tolerance(eigenvalues.view());
        eigenvalues.mapv_inplace(|l| if l > tol { l } else { F::zero() });

        let total = eigenvalues.sum();
        if total <= F::zero() {
            return Err(EstimatorError::ZeroVariance);
        }
        let ratios = &eigenvalues / total;

        let target = params.variance_fraction() - F::cast(1e-10);
        let mut n_components = 0;
        let mut cumulative = F::zero();
        for &ratio in ratios.iter() {
            if ratio == F::zero() {
                break;
            }
            cumulative += ratio;
            n_components += 1;
            if cumulative >= target {
                break;
            }
        }

        log::debug!(
            "pca keeps {} of {} components ({} of the variance)",
            n_components,
            n_features,
            cumulative
        );

        Ok(Pca {
            mean,
            components: eigenvectors.slice(s![.., ..n_components]).to_owned(),
            explained_variance: eigenvalues.slice(s![..n_components]).to_owned(),
            explained_variance_ratio: ratios.slice(s![..n_components]).to_owned(),
            variance_fraction: params.variance_fraction(),
        })
    }

    pub fn n_components(&self) -> usize {
        self.components.ncols()
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Principal directions as unit columns, by decreasing variance.
    pub fn components(&self) -> ArrayView2<F> {
        self.components.view()
    }

    pub fn explained_variance(&self) -> ArrayView1<F> {
        self.explained_variance.view()
    }

    pub fn explained_variance_ratio(&self) -> ArrayView1<F> {
        self.explained_variance_ratio.view()
    }

    /// Projects `records` onto the kept components.
    pub fn transform(&self, records: ArrayView2<F>) -> Result<ReducedFeatureSet<F>> {
        check_n_features(self.n_features(), records.ncols())?;
        let projected = (&records - &self.mean).dot(&self.components);
        Ok(ReducedFeatureSet {
            records: projected,
            variance_fraction: self.variance_fraction,
            explained_variance_ratio: self.explained_variance_ratio.clone(),
        })
    }
}

/// Records projected on principal components. Columns are unnamed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedFeatureSet<F> {
    records: Array2<F>,
    variance_fraction: F,
    explained_variance_ratio: Array1<F>,
}

impl<F: Float> ReducedFeatureSet<F> {
    pub fn records(&self) -> ArrayView2<F> {
        self.records.view()
    }

    pub fn n_components(&self) -> usize {
        self.records.ncols()
    }

    /// The requested fraction the projection was fitted with.
    pub fn variance_fraction(&self) -> F {
        self.variance_fraction
    }

    pub fn explained_variance_ratio(&self) -> ArrayView1<F> {
        self.explained_variance_ratio.view()
    }

    /// Share of the total variance explained by the kept components.
    pub fn retained_variance(&self) -> F {
        self.explained_variance_ratio.sum()
    }

    pub fn into_records(self) -> Array2<F> {
        self.records
    }
}

/// Fits a projection keeping `variance_fraction` of the variance and applies
/// it to the same records.
pub fn reduce<F: Float>(records: ArrayView2<F>, variance_fraction: F) -> Result<ReducedFeatureSet<F>> {
    Pca::params()
        .variance_fraction(variance_fraction)
        .fit(records)?
        .transform(records)
}
