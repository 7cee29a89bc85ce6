//! Dynamics constraint over a whole trajectory.

use log::debug;
use nalgebra::DVector;
use rayon::prelude::*;
use sprs::{CsMat, TriMat};

use crate::error::{Error, Result};
use crate::integrators::ExponentialIntegrator;

/// Applies one integrator between every adjacent pair of knot points.
///
/// With T knot points the stacked residual has (T - 1) dim entries and the
/// stacked Jacobian is (T - 1) dim x T z_dim. Pairs are evaluated in
/// parallel.
pub struct DynamicsConstraint<I> {
    integrator: I,
}

impl<I: ExponentialIntegrator> DynamicsConstraint<I> {
    pub fn new(integrator: I) -> Self {
        Self { integrator }
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    fn check_trajectory<Z: AsRef<[f64]>>(&self, knots: &[Z]) -> Result<()> {
        if knots.len() < 2 {
            return Err(Error::TrajectoryLength(knots.len()));
        }
        Ok(())
    }

    pub fn residuals<Z>(&self, knots: &[Z]) -> Result<Vec<DVector<f64>>>
    where Z: AsRef<[f64]> + Sync {
        self.check_trajectory(knots)?;
        knots.par_windows(2)
            .enumerate()
            .map(|(t, w)| self.integrator.residual(w[0].as_ref(), w[1].as_ref(), t))
            .collect()
    }

    /// All residuals concatenated in time order
    pub fn residual<Z>(&self, knots: &[Z]) -> Result<DVector<f64>>
    where Z: AsRef<[f64]> + Sync {
        let parts = self.residuals(knots)?;
        let dim = self.integrator.dim();
        let mut r = DVector::zeros(dim * parts.len());
        for (t, rt) in parts.iter().enumerate() {
            r.rows_mut(t * dim, dim).copy_from(rt);
        }
        Ok(r)
    }

    pub fn jacobians<Z>(&self, knots: &[Z]) -> Result<Vec<CsMat<f64>>>
    where Z: AsRef<[f64]> + Sync {
        self.check_trajectory(knots)?;
        knots.par_windows(2)
            .enumerate()
            .map(|(t, w)| self.integrator.jacobian(w[0].as_ref(), w[1].as_ref(), t))
            .collect()
    }

    /// Block-bidiagonal Jacobian of the concatenated residual with respect to
    /// the concatenated knot points
    pub fn jacobian<Z>(&self, knots: &[Z]) -> Result<CsMat<f64>>
    where Z: AsRef<[f64]> + Sync {
        let blocks = self.jacobians(knots)?;
        let dim = self.integrator.dim();
        let z_dim = self.integrator.z_dim();
        debug!("DynamicsConstraint: stacking {} Jacobian blocks of {}x{}", blocks.len(), dim, 2 * z_dim);

        let mut tri = TriMat::with_capacity(
            (blocks.len() * dim, knots.len() * z_dim),
            blocks.iter().map(|b| b.nnz()).sum());
        for (t, jt) in blocks.iter().enumerate() {
            for (&v, (i, j)) in jt.iter() {
                tri.add_triplet(t * dim + i, t * z_dim + j, v);
            }
        }
        Ok(tri.to_csr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrators::{sparse_to_dense, QuantumStateIntegrator};
    use crate::layout::{TimestepSpec, TrajectoryLayout};
    use crate::system::QuantumSystem;
    use approx::assert_relative_eq;
    use qrs_colloc_core::pauli::{sx, sz};

    fn constraint() -> DynamicsConstraint<QuantumStateIntegrator> {
        let layout = TrajectoryLayout::new(TimestepSpec::Fixed(0.2))
            .with_component("psi", 4).unwrap()
            .with_component("a", 1).unwrap();
        let sys = QuantumSystem::new(&sz(), &[sx()]);
        DynamicsConstraint::new(QuantumStateIntegrator::new("psi", "a", &sys, &layout).unwrap())
    }

    fn knots() -> Vec<Vec<f64>> {
        (0..4).map(|t| {
            let s = t as f64;
            vec![s.cos(), 0.1 * s, s.sin(), -0.2, 0.3 * s]
        }).collect()
    }

    #[test]
    fn test_stacked_residual() {
        let c = constraint();
        let z = knots();
        let r = c.residual(&z).unwrap();
        assert_eq!(r.len(), 12);
        let r1 = c.integrator().residual(&z[1], &z[2], 1).unwrap();
        assert_relative_eq!(r.rows(4, 4).into_owned(), r1, epsilon = 1e-15);
    }

    #[test]
    fn test_stacked_jacobian_blocks() {
        let c = constraint();
        let z = knots();
        let j = sparse_to_dense(&c.jacobian(&z).unwrap());
        assert_eq!(j.shape(), (12, 20));

        let j2 = sparse_to_dense(&c.integrator().jacobian(&z[2], &z[3], 2).unwrap());
        assert_relative_eq!(j.slice((8, 10), (4, 10)).into_owned(), j2, epsilon = 1e-15);
        assert!(j.slice((8, 0), (4, 10)).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_short_trajectory() {
        let c = constraint();
        let z = vec![vec![0.0; 5]];
        assert_eq!(c.residual(&z).unwrap_err(), Error::TrajectoryLength(1));
    }
}
