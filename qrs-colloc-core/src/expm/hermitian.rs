use log::warn;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::c64;
use crate::error::ExpmError;
use crate::iso::{iso_operator, iso_operator_to_complex, iso_to_ket, ket_to_iso};
use crate::matrix::{change_basis, drop_below, outer_zip_to, unchange_basis};
use super::{check_dim, check_square, MatrixExp};

const EIGEN_MAX_ITER: usize = 10_000;

/// Exponential of lifted skew-Hermitian generators by Hermitian
/// diagonalization.
///
/// A real generator `A = lift(M)` with `M = -iK`, `K` Hermitian, has
///     exp(A) = lift( V diag(exp(-i λ)) V^dag )
/// where `K = V diag(λ) V^dag`. Entries of the materialized exponential with
/// magnitude below `threshold` are dropped.
#[derive(Copy, Clone, Debug)]
pub struct HermitianExp {
    pub threshold: f64,
    /// Relative tolerance on the deviation of the input from a lifted
    /// skew-Hermitian matrix
    pub tol: f64,
}

impl Default for HermitianExp {
    fn default() -> Self {
        Self { threshold: 1.0e-12, tol: 1.0e-8 }
    }
}

/// Eigendecomposition of `K = iM` for a lifted generator `lift(M)`,
/// from which the exponential, its action and its Fréchet derivative
/// are all assembled.
#[derive(Clone, Debug)]
pub struct HermitianEig {
    vals: DVector<f64>,
    vecs: DMatrix<c64>,
    threshold: f64,
}

impl HermitianExp {
    pub fn new(threshold: f64, tol: f64) -> Self {
        Self { threshold, tol }
    }

    pub fn decompose(&self, a: &DMatrix<f64>) -> Result<HermitianEig, ExpmError> {
        let m = check_square(a)?;
        if m % 2 != 0 {
            return Err(ExpmError::OddDimension(m));
        }
        let mc = iso_operator_to_complex(a);
        let k = mc.map(|z| z * c64::i());

        let lift_dev = (iso_operator(&mc) - a).norm();
        let herm_dev = (&k - k.adjoint()).norm();
        let deviation = (lift_dev + herm_dev) / a.norm().max(1.0);
        if !deviation.is_finite() {
            return Err(ExpmError::NonFinite);
        }
        if deviation > self.tol {
            warn!("HermitianExp: generator deviates from a lifted skew-Hermitian matrix by {:e}", deviation);
            return Err(ExpmError::NotSkewHermitian { deviation });
        }

        let k = (&k + k.adjoint()) * c64::new(0.5, 0.0);
        let n = k.nrows();
        let eig = SymmetricEigen::try_new(k, f64::EPSILON, EIGEN_MAX_ITER)
            .ok_or(ExpmError::EigenConvergence { dim: n })?;
        if eig.eigenvalues.iter().any(|l| !l.is_finite()) {
            return Err(ExpmError::NonFinite);
        }

        Ok(HermitianEig { vals: eig.eigenvalues, vecs: eig.eigenvectors, threshold: self.threshold })
    }
}

impl HermitianEig {
    /// Eigenvalues of the Hermitian `K`
    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.vals
    }

    /// Dimension of the lifted generator
    pub fn dim(&self) -> usize {
        2 * self.vals.len()
    }

    fn phases(&self) -> DVector<c64> {
        self.vals.map(|l| c64::new(0.0, -l).exp())
    }

    /// exp(M) in the complex representation
    pub fn exp_complex(&self) -> DMatrix<c64> {
        unchange_basis(&DMatrix::from_diagonal(&self.phases()), &self.vecs)
    }

    /// exp(A) in the lifted representation, thresholded
    pub fn exp(&self) -> DMatrix<f64> {
        let mut e = iso_operator(&self.exp_complex());
        drop_below(&mut e, self.threshold);
        e
    }

    /// exp(A) v without materializing exp(A)
    pub fn expv(&self, v: &DVector<f64>) -> Result<DVector<f64>, ExpmError> {
        check_dim(self.dim(), v.len())?;
        let psi = iso_to_ket(v.as_slice());
        let c = self.vecs.ad_mul(&psi).component_mul(&self.phases());
        Ok(ket_to_iso(&(&self.vecs * c)))
    }

    /// Fréchet derivative of exp at A in the lifted direction `e`
    ///
    /// In the eigenbasis the derivative is the Hadamard product of the
    /// direction with the divided differences of exp over the eigenvalues
    /// of M = -iK.
    pub fn frechet(&self, e: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError> {
        let m = check_square(e)?;
        check_dim(self.dim(), m)?;
        let n = self.vals.len();

        let mut phi = DMatrix::zeros(n, n);
        outer_zip_to(&self.vals, &self.vals, &mut phi, |&lk, &ll| exp_divided_difference(lk, ll));

        let e_eig = change_basis(&iso_operator_to_complex(e), &self.vecs);
        let l = unchange_basis(&e_eig.component_mul(&phi), &self.vecs);
        Ok(iso_operator(&l))
    }
}

/// (exp(-i lk) - exp(-i ll)) / (-i lk + i ll), continuous through lk = ll
fn exp_divided_difference(lk: f64, ll: f64) -> c64 {
    let theta = ll - lk;
    // (exp(i θ) - 1) / (i θ)
    let phi1 = if theta.abs() < 1.0e-6 {
        c64::new(1.0 - theta * theta / 6.0, theta / 2.0)
    } else {
        c64::new(theta.sin() / theta, (1.0 - theta.cos()) / theta)
    };
    c64::new(0.0, -ll).exp() * phi1
}

impl MatrixExp for HermitianExp {
    fn expm(&self, a: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError> {
        Ok(self.decompose(a)?.exp())
    }

    fn expv(&self, a: &DMatrix<f64>, v: &DVector<f64>) -> Result<DVector<f64>, ExpmError> {
        self.decompose(a)?.expv(v)
    }

    fn frechet(&self, a: &DMatrix<f64>, e: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError> {
        self.decompose(a)?.frechet(e)
    }
}
