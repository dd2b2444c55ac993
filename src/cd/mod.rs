use ndarray::{Array1, Array2, ArrayView1};

use super::Float;
use crate::datafits::Datafit;
use crate::datasets::DatasetView;
use crate::helpers::helpers::{compute_alpha_max, solve_lin_sys};
use crate::penalties::Penalty;


/// Output of [`coordinate_descent`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<F> {
    pub coefficients: Array1<F>,
    /// Number of epochs actually run.
    pub n_epochs: usize,
    /// Final maximum distance of the gradient to the penalty subdifferential.
    pub kkt_max: F,
    /// Whether `kkt_max` reached the tolerance before the epoch cap.
    pub converged: bool,
}

/// This function computes the distance of the negative gradient of the datafit
/// to the subdifferential of the penalty. It returns an array containing the
/// distances for each feature as well as the maximum distance.
pub fn opt_cond_violation<F, DF, P>(
    dataset: &DatasetView<F>,
    w: ArrayView1<F>,
    Xw: ArrayView1<F>,
    datafit: &DF,
    penalty: &P,
) -> (Array1<F>, F)
where
    F: Float,
    DF: Datafit<F>,
    P: Penalty<F>,
{
    let grad = datafit.full_grad(dataset, Xw);
    penalty.subdiff_distance(w, grad.view())
}

/// One cycle of proximal coordinate updates over every feature. The model fit
/// `Xw` is updated in place along with the weights.
pub fn cd_epoch<F, DF, P>(
    dataset: &DatasetView<F>,
    datafit: &DF,
    penalty: &P,
    w: &mut Array1<F>,
    Xw: &mut Array1<F>,
) where
    F: Float,
    DF: Datafit<F>,
    P: Penalty<F>,
{
    let X = dataset.design_matrix();
    let lipschitz = datafit.lipschitz();

    for j in 0..w.len() {
        if lipschitz[j] == F::zero() {
            continue;
        }
        let old_w_j = w[j];
        let grad_j = datafit.gradient_j(dataset, Xw.view(), j);
        w[j] = penalty.prox(old_w_j - grad_j / lipschitz[j], F::one() / lipschitz[j]);

        let diff = w[j] - old_w_j;
        if diff != F::zero() {
            Xw.scaled_add(diff, &X.column(j));
        }
    }
}

/// This function performs Anderson acceleration given K previous iterates of
/// coordinate descent cycles. Anderson acceleration is a non-linear extrapolation
/// technique that finds extrapolated points during the descent.
///
/// The extrapolated point is kept if and only if it decreases the objective,
/// so the routine still converges.
///
/// Reference: `https://arxiv.org/pdf/2011.10065.pdf`
pub fn anderson_accel<F, DF, P>(
    dataset: &DatasetView<F>,
    datafit: &DF,
    penalty: &P,
    last_K_w: &mut Array2<F>,
    U: &mut Array2<F>,
    w: &mut Array1<F>,
    Xw: &mut Array1<F>,
    epoch: usize,
    K: usize,
) where
    F: Float,
    DF: Datafit<F>,
    P: Penalty<F>,
{
    last_K_w.row_mut(epoch % (K + 1)).assign(w);

    if epoch % (K + 1) != K {
        return;
    }

    for k in 0..K {
        let diff = &last_K_w.row(k + 1) - &last_K_w.row(k);
        U.row_mut(k).assign(&diff);
    }

    // Computes the extrapolation matrix à la Anderson
    let C = U.dot(&U.t());
    match solve_lin_sys(C.view(), Array1::<F>::ones(K).view()) {
        Ok(z) => {
            let z_sum = z.sum();
            if z_sum == F::zero() || !z_sum.is_finite() {
                return;
            }
            let c = &z / z_sum;

            let mut w_acc = Array1::<F>::zeros(w.len());
            for (k, &c_k) in c.iter().enumerate() {
                w_acc.scaled_add(c_k, &last_K_w.row(k));
            }
            let Xw_acc = dataset.design_matrix().dot(&w_acc);

            let p_obj = datafit.value(dataset, Xw.view()) + penalty.value(w.view());
            let p_obj_acc = datafit.value(dataset, Xw_acc.view()) + penalty.value(w_acc.view());

            if p_obj_acc < p_obj {
                w.assign(&w_acc);
                Xw.assign(&Xw_acc);
                log::trace!("[ACCEL] p_obj {} :: p_obj_acc {}", p_obj, p_obj_acc);
            }
        }
        // Some extrapolation matrices are too ill-conditioned to be inverted.
        // This is expected: the iterate is simply left untouched.
        Err(_) => {
            log::trace!("singular extrapolation matrix, could not extrapolate");
        }
    }
}

/// This is the backbone solver of the regularized estimators. It implements
/// the cyclic proximal coordinate descent, optionally accelerated by Anderson
/// extrapolation every `K + 1` epochs.
///
/// The stopping criterion is the maximum distance of the negative gradient
/// to the subdifferential of the penalty, relative to the largest correlation
/// between a feature and the targets (see
/// [`crate::helpers::helpers::compute_alpha_max`]). When `max_epochs` is
/// exhausted first, the current iterate is returned with `converged` unset.
pub fn coordinate_descent<F, DF, P>(
    dataset: &DatasetView<F>,
    datafit: &mut DF,
    penalty: &P,
    max_epochs: usize,
    tolerance: F,
    K: usize,
    use_acceleration: bool,
) -> Solution<F>
where
    F: Float,
    DF: Datafit<F>,
    P: Penalty<F>,
{
    let n_samples = dataset.n_samples();
    let n_features = dataset.n_features();

    // Pre-computes the Lipschitz constants and the matrix-vector Xty product
    // that is later used in the optimization procedure.
    datafit.initialize(dataset);
    let datafit: &DF = datafit;

    let scale = compute_alpha_max(*dataset.design_matrix(), *dataset.targets());
    let tol = if scale > F::zero() {
        tolerance * scale
    } else {
        tolerance
    };

    let mut w = Array1::<F>::zeros(n_features);
    let mut Xw = Array1::<F>::zeros(n_samples);
    let mut last_K_w = Array2::<F>::zeros((K + 1, n_features));
    let mut U = Array2::<F>::zeros((K, n_features));

    let mut kkt_max = F::infinity();
    let mut n_epochs = 0;
    let mut converged = false;

    for epoch in 0..max_epochs {
        cd_epoch(dataset, datafit, penalty, &mut w, &mut Xw);

        if use_acceleration {
            anderson_accel(
                dataset,
                datafit,
                penalty,
                &mut last_K_w,
                &mut U,
                &mut w,
                &mut Xw,
                epoch,
                K,
            );
        }

        n_epochs = epoch + 1;
        kkt_max = opt_cond_violation(dataset, w.view(), Xw.view(), datafit, penalty).1;

        if epoch % 10 == 0 {
            let p_obj = datafit.value(dataset, Xw.view()) + penalty.value(w.view());
            log::debug!(
                "epoch: {} :: obj: {} :: kkt: {}",
                epoch,
                p_obj,
                kkt_max
            );
        }

        if kkt_max <= tol {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "coordinate descent stopped after {} epochs with kkt violation {} (tolerance {})",
            n_epochs,
            kkt_max,
            tol
        );
    }

    Solution {
        coefficients: w,
        n_epochs,
        kkt_max,
        converged,
    }
}
