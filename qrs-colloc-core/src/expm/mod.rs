//! Matrix exponential engine.
//!
//! Two strategies sit behind [`MatrixExp`]:
//!
//!  * [`HermitianExp`] for generators that are the real lift of a
//!    skew-Hermitian matrix `-iK`. The Hermitian `K` is diagonalized and
//!    the exponential is assembled in its eigenbasis.
//!  * [`PadeExp`] for generators with no structure (Liouvillians), using
//!    scaling and squaring with a Padé approximant.
//!
//! Nothing is cached between calls; every call re-derives the exponential
//! of the matrix it is given.

use nalgebra::{DMatrix, DVector};
use crate::error::ExpmError;

mod hermitian;
mod pade;

pub use hermitian::{HermitianEig, HermitianExp};
pub use pade::PadeExp;

pub trait MatrixExp {
    /// exp(a)
    fn expm(&self, a: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError>;

    /// exp(a) v
    fn expv(&self, a: &DMatrix<f64>, v: &DVector<f64>) -> Result<DVector<f64>, ExpmError> {
        Ok(self.expm(a)? * v)
    }

    /// Fréchet derivative of exp at `a` in the direction `e`, i.e.
    /// d/ds exp(a + s e) at s = 0
    fn frechet(&self, a: &DMatrix<f64>, e: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError>;
}

pub(crate) fn check_square(a: &DMatrix<f64>) -> Result<usize, ExpmError> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(ExpmError::NotSquare { rows, cols });
    }
    Ok(rows)
}

pub(crate) fn check_dim(expected: usize, actual: usize) -> Result<(), ExpmError> {
    if expected != actual {
        return Err(ExpmError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
