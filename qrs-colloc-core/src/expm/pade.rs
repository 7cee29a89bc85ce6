use nalgebra::{DMatrix, DVector};

use crate::error::ExpmError;
use crate::matrix::{all_finite, one_norm};
use super::{check_dim, check_square, MatrixExp};

const TAYLOR_MAX_TERMS: usize = 40;
/// Above this 1-norm `expv` materializes the exponential instead of substepping
const EXPV_MAX_NORM: f64 = 64.0;

/// Generic dense exponential for generators with no assumed structure,
/// such as Liouvillians.
///
/// `expm` is scaling and squaring with a Padé(13) approximant (Higham 2005).
/// `expv` applies a scaled truncated Taylor series to the vector so the
/// exponential is never materialized, and `frechet` reads the off-diagonal
/// block of the exponential of `[[A, E], [0, A]]`.
#[derive(Copy, Clone, Debug, Default)]
pub struct PadeExp;

impl MatrixExp for PadeExp {
    fn expm(&self, a: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError> {
        check_square(a)?;
        if !all_finite(a.as_slice()) {
            return Err(ExpmError::NonFinite);
        }
        let e = a.exp();
        if !all_finite(e.as_slice()) {
            return Err(ExpmError::NonFinite);
        }
        Ok(e)
    }

    fn expv(&self, a: &DMatrix<f64>, v: &DVector<f64>) -> Result<DVector<f64>, ExpmError> {
        let n = check_square(a)?;
        check_dim(n, v.len())?;
        let norm = one_norm(a);
        if !norm.is_finite() {
            return Err(ExpmError::NonFinite);
        }

        if norm > EXPV_MAX_NORM {
            return Ok(self.expm(a)? * v);
        }

        // Power-of-two substeps, each with ||h A||_1 <= 1
        let steps = 1usize << (norm.log2().ceil().max(0.0) as u32);
        let h = 1.0 / steps as f64;
        let mut w = v.clone();
        for _ in 0..steps {
            let mut term = w.clone();
            let mut acc = w.clone();
            for k in 1..=TAYLOR_MAX_TERMS {
                term = (a * &term) * (h / k as f64);
                acc += &term;
                if term.amax() <= f64::EPSILON * acc.amax() {
                    break;
                }
            }
            w = acc;
        }

        if !all_finite(w.as_slice()) {
            return Err(ExpmError::NonFinite);
        }
        Ok(w)
    }

    fn frechet(&self, a: &DMatrix<f64>, e: &DMatrix<f64>) -> Result<DMatrix<f64>, ExpmError> {
        let n = check_square(a)?;
        check_dim(n, check_square(e)?)?;

        let mut block = DMatrix::zeros(2 * n, 2 * n);
        block.slice_mut((0, 0), (n, n)).copy_from(a);
        block.slice_mut((n, n), (n, n)).copy_from(a);
        block.slice_mut((0, n), (n, n)).copy_from(e);

        let exp_block = self.expm(&block)?;
        Ok(exp_block.slice((0, n), (n, n)).into_owned())
    }
}
