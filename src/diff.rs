//! Jacobians of vector-valued functions.
//!
//! The integrators only require "the Jacobian of a given vector function at
//! a point". [`FiniteDifference`] satisfies that contract with fixed
//! stencils; it is the validation oracle for the exact drive derivatives
//! and the fallback selected by `DiffMode::FiniteDifference`.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

static FORWARD_STENC: [(f64, f64); 2] = [(0.0, -1.0), (1.0, 1.0)];

static CENTRAL_STENC: [(f64, f64); 2] = [(-1.0, -0.5), (1.0, 0.5)];

static FIVE_POINT_STENC: [(f64, f64); 4] = [
    (-2.0, 1.0 / 12.0), (-1.0, -8.0 / 12.0),
    (1.0, 8.0 / 12.0), (2.0, -1.0 / 12.0)];

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Stencil {
    Forward,
    Central,
    FivePoint,
}

impl Stencil {
    /// (offset, weight) pairs in units of the step
    fn points(&self) -> &'static [(f64, f64)] {
        match self {
            Stencil::Forward => &FORWARD_STENC,
            Stencil::Central => &CENTRAL_STENC,
            Stencil::FivePoint => &FIVE_POINT_STENC,
        }
    }
}

pub trait Differentiator {
    /// Jacobian of `f` at `x`, with one column per component of `x`
    fn jacobian<F, E>(&self, f: F, x: &DVector<f64>) -> Result<DMatrix<f64>, E>
    where F: Fn(&DVector<f64>) -> Result<DVector<f64>, E>;
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiniteDifference {
    /// Relative step; the absolute step for x_j is step * max(|x_j|, 1)
    pub step: f64,
    pub stencil: Stencil,
}

impl Default for FiniteDifference {
    fn default() -> Self {
        Self { step: 1.0e-6, stencil: Stencil::Central }
    }
}

impl FiniteDifference {
    pub fn new(step: f64, stencil: Stencil) -> Self {
        Self { step, stencil }
    }
}

impl Differentiator for FiniteDifference {
    fn jacobian<F, E>(&self, f: F, x: &DVector<f64>) -> Result<DMatrix<f64>, E>
    where F: Fn(&DVector<f64>) -> Result<DVector<f64>, E> {
        let f0 = f(x)?;
        let mut jac = DMatrix::zeros(f0.len(), x.len());
        let points = self.stencil.points();

        for j in 0..x.len() {
            let h = self.step * x[j].abs().max(1.0);
            let evals: SmallVec<[DVector<f64>; 4]> = points.iter()
                .map(|&(k, _)| {
                    if k == 0.0 {
                        return Ok(f0.clone());
                    }
                    let mut xp = x.clone();
                    xp[j] += k * h;
                    f(&xp)
                })
                .collect::<Result<_, E>>()?;

            let mut col = jac.column_mut(j);
            for (fk, &(_, w)) in evals.iter().zip(points.iter()) {
                col.axpy(w / h, fk, 1.0);
            }
        }
        Ok(jac)
    }
}
