use ndarray::{Array1, ArrayView1};

use super::Float;
use crate::helpers::prox::{shrinkage, soft_thresholding};


/// This trait provides three methods needed to update the weights during the
/// optimization routine.
pub trait Penalty<F: Float> {
    /// This method is called when evaluating the objective value.
    ///
    /// It is jointly used with [`crate::datafits::Datafit::value`] in order to
    /// compute the value of the objective.
    fn value(&self, w: ArrayView1<F>) -> F;

    /// This method computes the proximal gradient step during the update of the
    /// weights. For a given penalty, it implements its proximal operator.
    fn prox(&self, value: F, step_size: F) -> F;

    /// This method is used as the stopping criterion of the solver. It
    /// computes the distance between the negative gradient of the datafit and
    /// the subdifferential of the penalty.
    ///
    /// It outputs the distances of the gradient of each feature to the
    /// subdifferential of the penalty, as well as the maximum distance.
    fn subdiff_distance(&self, w: ArrayView1<F>, grad: ArrayView1<F>) -> (Array1<F>, F);
}

/// The L1 penalty
///
/// A widely-used penalty made popular by the LASSO model. It is used in a
/// regression setting and yields sparse solutions. Note that LASSO yields a
/// biased solution compared to the ordinary least square solution.
#[derive(Debug, Clone, PartialEq)]
pub struct L1<F: Float> {
    alpha: F,
}

impl<F: Float> L1<F> {
    /// Instantiates a L1 penalty with a non-negative regularization
    /// hyperparameter.
    pub fn new(alpha: F) -> Self {
        L1 { alpha }
    }
}

impl<F: Float> Penalty<F> for L1<F> {
    /// Computes the L1-norm of the weights
    fn value(&self, w: ArrayView1<F>) -> F {
        self.alpha * w.iter().map(|&wj| wj.abs()).sum()
    }

    /// Applies the soft-thresholding operator to a weight scalar
    fn prox(&self, value: F, stepsize: F) -> F {
        soft_thresholding(value, self.alpha * stepsize)
    }

    /// Computes the distance of the gradient to the subdifferential
    ///
    /// The distance of the gradient to the subdifferential of L1 is:
    /// dist(grad, subdiff) = max(0, |grad| - alpha)         if w[j] = 0
    ///                       |- grad - sign(w[j]) * alpha|  otherwise
    fn subdiff_distance(&self, w: ArrayView1<F>, grad: ArrayView1<F>) -> (Array1<F>, F) {
        let subdiff_dist = Array1::from_vec(
            grad.iter()
                .zip(w.iter())
                .map(|(&grad_j, &w_j)| match w_j == F::zero() {
                    true => F::max(F::zero(), grad_j.abs() - self.alpha),
                    false => (-grad_j - w_j.signum() * self.alpha).abs(),
                })
                .collect(),
        );
        let max_dist = subdiff_dist.fold(F::zero(), |max_val, &dist| F::max(max_val, dist));
        (subdiff_dist, max_dist)
    }
}

/// The squared L2 penalty
///
/// `alpha / 2 * ||w||^2`, the penalty of the Ridge model. It shrinks every
/// weight toward zero without zeroing any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct L2<F: Float> {
    alpha: F,
}

impl<F: Float> L2<F> {
    /// Instantiates a L2 penalty with a non-negative regularization
    /// hyperparameter.
    pub fn new(alpha: F) -> Self {
        L2 { alpha }
    }
}

impl<F: Float> Penalty<F> for L2<F> {
    fn value(&self, w: ArrayView1<F>) -> F {
        F::cast(0.5) * self.alpha * w.dot(&w)
    }

    fn prox(&self, value: F, stepsize: F) -> F {
        shrinkage(value, self.alpha * stepsize)
    }

    /// The penalty is smooth: the subdifferential reduces to `alpha * w[j]`.
    fn subdiff_distance(&self, w: ArrayView1<F>, grad: ArrayView1<F>) -> (Array1<F>, F) {
        let subdiff_dist = Array1::from_vec(
            grad.iter()
                .zip(w.iter())
                .map(|(&grad_j, &w_j)| (grad_j + self.alpha * w_j).abs())
                .collect(),
        );
        let max_dist = subdiff_dist.fold(F::zero(), |max_val, &dist| F::max(max_val, dist));
        (subdiff_dist, max_dist)
    }
}
