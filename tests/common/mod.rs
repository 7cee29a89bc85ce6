#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::distributions::Uniform;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256Plus;

use qrs_colloc::c64;
use qrs_colloc_core::pauli::{sm, sx, sy, sz};
use qrs_colloc::diff::{Differentiator, FiniteDifference, Stencil};
use qrs_colloc::integrators::sparse_to_dense;
use qrs_colloc::system::Generator;
use qrs_colloc::{ExponentialIntegrator, OpenQuantumSystem, QuantumSystem, TimestepSpec, TrajectoryLayout};

pub const DT: f64 = 0.1;

pub fn init_logger() {
    let _ = simple_logger::init_with_level(log::Level::Warn);
}

pub fn rng(seed: u64) -> Xoshiro256Plus {
    Xoshiro256Plus::seed_from_u64(seed)
}

/// H(a) = σz + a_1 σx + a_2 σy
pub fn two_level_system() -> QuantumSystem {
    QuantumSystem::new(&sz(), &[sx(), sy()])
}

/// The same Hamiltonian with amplitude damping through σ₋
pub fn two_level_open_system() -> OpenQuantumSystem {
    OpenQuantumSystem::new(&sz(), &[sx(), sy()], &[sm() * c64::new(0.4, 0.0)])
}

/// `state`, the two-channel drive `a`, its derivative `da` and, for a free
/// timestep, `dt`
pub fn layout(state_dim: usize, freetime: bool) -> TrajectoryLayout {
    let timestep = if freetime {
        TimestepSpec::Variable("dt".to_owned())
    } else {
        TimestepSpec::Fixed(DT)
    };
    let layout = TrajectoryLayout::new(timestep)
        .with_component("x", state_dim).unwrap()
        .with_component("a", 2).unwrap()
        .with_component("da", 2).unwrap();
    if freetime {
        layout.with_component("dt", 1).unwrap()
    } else {
        layout
    }
}

/// T random knot points; a free timestep is drawn near `DT`
pub fn random_knots(layout: &TrajectoryLayout, t: usize, rng: &mut Xoshiro256Plus) -> Vec<Vec<f64>> {
    let dt_idx = layout.timestep_index().unwrap();
    let jitter = Uniform::new(-0.02, 0.02);
    (0..t).map(|_| {
        let mut z: Vec<f64> = (0..layout.dim()).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        if let Some(i) = dt_idx {
            z[i] = DT + rng.sample(jitter);
        }
        z
    }).collect()
}

/// Five-point finite difference Jacobian of the residual with respect to
/// the concatenated (z_t, z_{t+1})
pub fn fd_jacobian<I: ExponentialIntegrator>(integrator: &I, zt: &[f64], ztt: &[f64], t: usize) -> DMatrix<f64> {
    let z_dim = zt.len();
    let z = DVector::from_iterator(2 * z_dim, zt.iter().chain(ztt.iter()).cloned());
    FiniteDifference::new(1.0e-4, Stencil::FivePoint)
        .jacobian(|z: &DVector<f64>| {
            integrator.residual(&z.as_slice()[..z_dim], &z.as_slice()[z_dim..], t)
        }, &z)
        .unwrap()
}

pub fn dense_jacobian<I: ExponentialIntegrator>(integrator: &I, zt: &[f64], ztt: &[f64], t: usize) -> DMatrix<f64> {
    sparse_to_dense(&integrator.jacobian(zt, ztt, t).unwrap())
}

/// Overwrites the `x` component of `z`
pub fn set_state(layout: &TrajectoryLayout, z: &mut [f64], x: &DVector<f64>) {
    let r = layout.range("x").unwrap();
    z[r].copy_from_slice(x.as_slice());
}

pub fn get_state(layout: &TrajectoryLayout, z: &[f64]) -> DVector<f64> {
    DVector::from_column_slice(&z[layout.range("x").unwrap()])
}

pub fn drives(layout: &TrajectoryLayout, z: &[f64]) -> Vec<f64> {
    z[layout.range("a").unwrap()].to_vec()
}

pub fn timestep(layout: &TrajectoryLayout, z: &[f64]) -> f64 {
    match layout.timestep_index().unwrap() {
        Some(i) => z[i],
        None => DT,
    }
}

/// exp(-i dt H)
pub fn propagator(h: &DMatrix<c64>, dt: f64) -> DMatrix<c64> {
    h.map(|z| z * c64::new(0.0, -dt)).exp()
}

/// Drive columns and timestep column of -exp(Δt G(a)) x by complex-step
/// differentiation, exact up to rounding
pub fn complex_step_columns(generator: &dyn Generator, a: &[f64], dt: f64, x: &DVector<f64>)
    -> (DMatrix<f64>, DVector<f64>)
{
    let h = 1.0e-20;
    let g = generator.eval(a);
    let xc = x.map(|v| c64::new(v, 0.0));
    let derivative = |gc: DMatrix<c64>| (gc.exp() * &xc).map(|z| -z.im / h);

    let mut da = DMatrix::zeros(x.len(), a.len());
    for j in 0..a.len() {
        let dg = generator.drive_derivative(a, j);
        let gc = g.zip_map(&dg, |gij, dij| c64::new(gij * dt, dij * dt * h));
        da.set_column(j, &derivative(gc));
    }
    let ddt = derivative(g.map(|gij| c64::new(gij * dt, gij * h)));
    (da, ddt)
}
