
/// This module implements the proximal operators of the penalties.
pub mod prox {
    use crate::Float;

    /// The soft-thresholding operator is the proximal operator used by
    /// [`crate::penalties::L1`].
    pub fn soft_thresholding<F: Float>(x: F, threshold: F) -> F {
        if x > threshold {
            x - threshold
        } else if x < -threshold {
            x + threshold
        } else {
            F::zero()
        }
    }

    /// The proximal operator of `alpha / 2 * x^2`, used by
    /// [`crate::penalties::L2`].
    pub fn shrinkage<F: Float>(x: F, threshold: F) -> F {
        x / (F::one() + threshold)
    }
}

/// This module contains helper functions shared by the solvers.
pub mod helpers {
    use crate::estimators::error::{EstimatorError, Result};
    use crate::Float;
    use ndarray::Data;
    use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Ix1};
    use std::cmp::Ordering;

    /// This function computes the maximum regularization hyperparameter value
    /// for single task models. A L1 regularization larger than this value
    /// yields a null solution. The solvers also use it as the scale of their
    /// stopping criterion.
    pub fn compute_alpha_max<F: Float>(X: ArrayView2<F>, y: ArrayView1<F>) -> F {
        let n_samples = F::cast(X.shape()[0]);
        let Xty = X.t().dot(&y);
        let alpha_max = Xty.fold(F::zero(), |max_val, &x| x.abs().max(max_val));
        alpha_max / n_samples
    }

    /// This is a helper method that sorts the indices of an array based on some
    /// `compare` closure. The sort is stable: indices comparing equal keep
    /// their original order.
    /// Reference: `https://github.com/rust-ndarray/ndarray/issues/1145`
    pub fn argsort_by<S, F>(arr: &ArrayBase<S, Ix1>, mut compare: F) -> Vec<usize>
    where
        S: Data,
        F: FnMut(&S::Elem, &S::Elem) -> Ordering,
    {
        let mut indices: Vec<usize> = (0..arr.len()).collect();
        indices.sort_by(move |&i, &j| compare(&arr[i], &arr[j]));
        indices
    }

    /// This function solves a linear system using Gaussian elimination. It is
    /// called in [`crate::cd::anderson_accel`] to invert the extrapolation
    /// matrix.
    pub fn solve_lin_sys<F: Float>(A: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
        // Concatenation
        let size = b.len();
        let mut system = Array2::<F>::zeros((size, size + 1));
        for i in 0..size {
            for j in 0..(size + 1) {
                system[[i, j]] = if j == size { b[i] } else { A[[i, j]] };
            }
        }

        // Echelon form
        for i in 0..size.saturating_sub(1) {
            for j in i..size - 1 {
                if system[[i, i]] == F::zero() {
                    continue;
                } else {
                    let factor = system[[j + 1, i]] / system[[i, i]];
                    for k in i..size + 1 {
                        system[[j + 1, k]] = system[[j + 1, k]] - factor * system[[i, k]];
                    }
                }
            }
        }

        // Gaussian eliminated
        for i in (1..size).rev() {
            if system[[i, i]] == F::zero() {
                continue;
            } else {
                for j in (1..i + 1).rev() {
                    let factor = system[[j - 1, i]] / system[[i, i]];
                    for k in (0..size + 1).rev() {
                        system[[j - 1, k]] = system[[j - 1, k]] - factor * system[[i, k]];
                    }
                }
            }
        }

        let mut x = Array1::<F>::zeros(size);
        for i in 0..size {
            if system[[i, i]] == F::zero() {
                return Err(EstimatorError::SingularMatrix);
            } else {
                system[[i, size]] = system[[i, size]] / system[[i, i]];
                system[[i, i]] = F::one();
                x[i] = system[[i, size]];
            }
        }

        Ok(x)
    }
}

/// Dense factorizations used by the least-squares estimators and the
/// principal component analysis.
pub mod linalg {
    use crate::estimators::error::{EstimatorError, Result};
    use crate::Float;
    use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

    use std::cmp::Ordering;

    use super::helpers::argsort_by;

    const MAX_SWEEPS: usize = 100;

    /// Cholesky factorization `A = L L^T` of a symmetric positive definite
    /// matrix. A pivot that vanishes relative to its diagonal entry means the
    /// matrix is (numerically) singular.
    pub fn cholesky_factorization<F: Float>(A: ArrayView2<F>) -> Result<Array2<F>> {
        let n = A.nrows();
        let mut L = Array2::<F>::zeros((n, n));
        let rel_tol = F::cast(1e-10);

        for j in 0..n {
            let mut d = A[[j, j]];
            for k in 0..j {
                d -= L[[j, k]] * L[[j, k]];
            }
            if d <= F::zero() || d <= rel_tol * A[[j, j]] {
                return Err(EstimatorError::SingularMatrix);
            }
            let l_jj = d.sqrt();
            L[[j, j]] = l_jj;

            for i in (j + 1)..n {
                let mut s = A[[i, j]];
                for k in 0..j {
                    s -= L[[i, k]] * L[[j, k]];
                }
                L[[i, j]] = s / l_jj;
            }
        }

        Ok(L)
    }

    /// Solves `L z = b` for a lower triangular `L`.
    pub fn forward_substitution<F: Float>(L: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
        let n = b.len();
        let mut z = Array1::<F>::zeros(n);
        for i in 0..n {
            if L[[i, i]] == F::zero() {
                return Err(EstimatorError::SingularMatrix);
            }
            let mut s = b[i];
            for k in 0..i {
                s -= L[[i, k]] * z[k];
            }
            z[i] = s / L[[i, i]];
        }
        Ok(z)
    }

    /// Solves `U x = b` for an upper triangular `U`.
    pub fn backward_substitution<F: Float>(U: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
        let n = b.len();
        let mut x = Array1::<F>::zeros(n);
        for i in (0..n).rev() {
            if U[[i, i]] == F::zero() {
                return Err(EstimatorError::SingularMatrix);
            }
            let mut s = b[i];
            for k in (i + 1)..n {
                s -= U[[i, k]] * x[k];
            }
            x[i] = s / U[[i, i]];
        }
        Ok(x)
    }

    /// Solves `A x = b` for a symmetric positive definite `A`.
    pub fn solve_lin_sys_by_cholesky<F: Float>(
        A: ArrayView2<F>,
        b: ArrayView1<F>,
    ) -> Result<Array1<F>> {
        let L = cholesky_factorization(A)?;
        let z = forward_substitution(L.view(), b)?;
        backward_substitution(L.t(), z.view())
    }

    /// Eigendecomposition of a symmetric matrix by the cyclic Jacobi method.
    ///
    /// Returns the eigenvalues in descending order and the matching unit
    /// eigenvectors as columns. The sign of each eigenvector is fixed so that
    /// its largest-magnitude entry is positive, which makes the output fully
    /// deterministic. Non-finite entries, in the input or produced by the
    /// rotations, are reported as [`EstimatorError::NonFiniteResult`].
    pub fn symmetric_eigen<F: Float>(A: ArrayView2<F>) -> Result<(Array1<F>, Array2<F>)> {
        if A.iter().any(|x| !x.is_finite()) {
            return Err(EstimatorError::NonFiniteResult("eigendecomposition"));
        }
        let n = A.nrows();
        let mut a = A.to_owned();
        let mut v = Array2::<F>::eye(n);

        let scale: F = a.iter().map(|&x| x * x).sum();
        let threshold = F::epsilon() * F::epsilon() * scale;

        for _ in 0..MAX_SWEEPS {
            let mut off = F::zero();
            for p in 0..n {
                for q in (p + 1)..n {
                    off += a[[p, q]] * a[[p, q]];
                }
            }
            if off <= threshold {
                break;
            }

            for p in 0..n {
                for q in (p + 1)..n {
                    let a_pq = a[[p, q]];
                    if a_pq == F::zero() {
                        continue;
                    }
                    let theta = (a[[q, q]] - a[[p, p]]) / (F::cast(2.) * a_pq);
                    let sign = if theta < F::zero() { -F::one() } else { F::one() };
                    let t = sign / (theta.abs() + (theta * theta + F::one()).sqrt());
                    let c = F::one() / (t * t + F::one()).sqrt();
                    let s = t * c;

                    for k in 0..n {
                        let a_kp = a[[k, p]];
                        let a_kq = a[[k, q]];
                        a[[k, p]] = c * a_kp - s * a_kq;
                        a[[k, q]] = s * a_kp + c * a_kq;
                    }
                    for k in 0..n {
                        let a_pk = a[[p, k]];
                        let a_qk = a[[q, k]];
                        a[[p, k]] = c * a_pk - s * a_qk;
                        a[[q, k]] = s * a_pk + c * a_qk;
                    }
                    for k in 0..n {
                        let v_kp = v[[k, p]];
                        let v_kq = v[[k, q]];
                        v[[k, p]] = c * v_kp - s * v_kq;
                        v[[k, q]] = s * v_kp + c * v_kq;
                    }
                }
            }
        }

        let diagonal = a.diag().to_owned();
        if diagonal.iter().chain(v.iter()).any(|x| !x.is_finite()) {
            return Err(EstimatorError::NonFiniteResult("eigendecomposition"));
        }
        let order = argsort_by(&diagonal, |x, y| y.partial_cmp(x).unwrap_or(Ordering::Equal));

        let mut eigenvalues = Array1::<F>::zeros(n);
        let mut eigenvectors = Array2::<F>::zeros((n, n));
        for (dest, &src) in order.iter().enumerate() {
            eigenvalues[dest] = diagonal[src];
            let column = v.column(src);
            let pivot = column
                .iter()
                .fold(F::zero(), |best, &x| if x.abs() > best.abs() { x } else { best });
            let sign = if pivot < F::zero() { -F::one() } else { F::one() };
            eigenvectors.column_mut(dest).assign(&column.mapv(|x| x * sign));
        }

        Ok((eigenvalues, eigenvectors))
    }

    /// Relative cutoff below which an eigenvalue of a Gram or covariance
    /// matrix is treated as zero.
    pub fn rank_tolerance<F: Float>(eigenvalues: ArrayView1<F>) -> F {
        let largest = eigenvalues.fold(F::zero(), |m, &x| m.max(x.abs()));
        F::cast(eigenvalues.len().max(1)) * F::epsilon() * largest
    }

    /// Minimum-norm least-squares solution of `X w = y`.
    ///
    /// The normal equations are solved by Cholesky factorization. When the
    /// Gram matrix is rank deficient the pseudo-inverse obtained from its
    /// eigendecomposition is used instead.
    pub fn solve_least_squares<F: Float>(X: ArrayView2<F>, y: ArrayView1<F>) -> Result<Array1<F>> {
        if X.nrows() != y.len() {
            return Err(EstimatorError::DimensionMismatch {
                what: "number of targets",
                expected: X.nrows(),
                actual: y.len(),
            });
        }
        let gram = X.t().dot(&X);
        let Xty = X.t().dot(&y);
        if gram.iter().chain(Xty.iter()).any(|x| !x.is_finite()) {
            return Err(EstimatorError::NonFiniteResult("least squares"));
        }

        match solve_lin_sys_by_cholesky(gram.view(), Xty.view()) {
            Ok(w) => Ok(w),
            Err(EstimatorError::SingularMatrix) => {
                log::debug!("rank deficient gram matrix, using the pseudo-inverse");
                let (eigenvalues, eigenvectors) = symmetric_eigen(gram.view())?;
                let tol = rank_tolerance(eigenvalues.view());
                let projected = eigenvectors.t().dot(&Xty);
                let scaled = Array1::from_iter(
                    projected
                        .iter()
                        .zip(eigenvalues.iter())
                        .map(|(&p, &l)| if l > tol { p / l } else { F::zero() }),
                );
                Ok(eigenvectors.dot(&scaled))
            }
            Err(e) => Err(e),
        }
    }
}

/// This module contains helpers functions to efficiently write tests.
pub mod test_helpers {
    use crate::Float;
    use approx::AbsDiffEq;
    use ndarray::prelude::*;
    use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    pub fn assert_array_all_close<F>(x: ArrayView1<F>, y: ArrayView1<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.len(), y.len());
        for i in 0..x.len() {
            if x[i].abs_diff_ne(&y[i], delta) {
                panic!("x: {}, y: {} ; with precision level {}", x[i], y[i], delta);
            }
        }
    }

    pub fn assert_array2d_all_close<F>(x: ArrayView2<F>, y: ArrayView2<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.shape()[0], y.shape()[0]);
        assert_eq!(x.shape()[1], y.shape()[1]);
        for i in 0..x.shape()[0] {
            for j in 0..x.shape()[1] {
                if x[[i, j]].abs_diff_ne(&y[[i, j]], delta) {
                    panic!(
                        "x: {}, y: {} ; with precision level {}",
                        x[[i, j]],
                        y[[i, j]],
                        delta
                    );
                }
            }
        }
    }

    pub fn fill_random_vector(capacity: usize, seed: u64) -> Vec<f64> {
        let mut r = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0., 1.).unwrap();

        let mut data_x: Vec<f64> = Vec::with_capacity(capacity);
        for _ in 0..data_x.capacity() {
            data_x.push(normal.sample(&mut r));
        }
        data_x
    }

    /// Gaussian design, Gaussian weights and unit Gaussian noise.
    pub fn generate_random_data(n_samples: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
        let data_x = fill_random_vector(n_samples * n_features, 42);
        let data_w = fill_random_vector(n_features, 43);
        let data_e = fill_random_vector(n_samples, 44);
        let X = Array2::from_shape_vec((n_samples, n_features).f(), data_x).unwrap();
        let true_w = Array1::from_shape_vec(n_features, data_w).unwrap();
        let noise = Array1::from_shape_vec(n_samples, data_e).unwrap();
        let y = X.dot(&true_w) + noise;

        (X, y)
    }

    /// Builds `(names, columns)` pairs ready for [`crate::datasets::Table::new`]
    /// from a design matrix and targets.
    pub fn table_columns(
        X: ArrayView2<f64>,
        y: ArrayView1<f64>,
        target: &str,
    ) -> Vec<(String, Vec<f64>)> {
        let mut columns: Vec<(String, Vec<f64>)> = X
            .columns()
            .into_iter()
            .enumerate()
            .map(|(j, col)| (format!("x{}", j), col.to_vec()))
            .collect();
        columns.push((target.to_string(), y.to_vec()));
        columns
    }
}
