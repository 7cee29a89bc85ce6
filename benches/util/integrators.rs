use criterion::{BenchmarkId, Criterion};
use nalgebra::DMatrix;
use rand::prelude::*;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256Plus;

use qrs_colloc::c64;
use qrs_colloc_core::pauli::{eye, sm, sx, sz, tensor_list};
use qrs_colloc::{
    DensityOperatorIntegrator, DynamicsConstraint, ExponentialIntegrator, OpenQuantumSystem,
    QuantumSystem, TimestepSpec, TrajectoryLayout, UnitaryIntegrator,
};

/// σz on every site, σz σz between neighbours, one σx drive per site
fn spin_chain(sites: usize) -> (DMatrix<c64>, Vec<DMatrix<c64>>) {
    let site_op = |op: &DMatrix<c64>, k: usize| {
        let ops: Vec<_> = (0..sites).map(|i| if i == k { op.clone() } else { eye(2) }).collect();
        tensor_list(&ops)
    };
    let mut h0 = site_op(&sz(), 0);
    for k in 1..sites {
        h0 += site_op(&sz(), k);
        h0 += site_op(&sz(), k - 1) * site_op(&sz(), k);
    }
    let drives = (0..sites).map(|k| site_op(&sx(), k)).collect();
    (h0, drives)
}

fn layout(state_dim: usize, n_drives: usize) -> TrajectoryLayout {
    TrajectoryLayout::new(TimestepSpec::Variable("dt".to_owned()))
        .with_component("x", state_dim).unwrap()
        .with_component("a", n_drives).unwrap()
        .with_component("dt", 1).unwrap()
}

fn random_knots(layout: &TrajectoryLayout, t: usize) -> Vec<Vec<f64>> {
    let mut rng = Xoshiro256Plus::seed_from_u64(1234);
    let dt = layout.timestep_index().unwrap().unwrap();
    (0..t).map(|_| {
        let mut z: Vec<f64> = (0..layout.dim()).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        z[dt] = 0.1;
        z
    }).collect()
}

pub fn bench_unitary_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("unitary_jacobian");
    for &sites in &[1usize, 2, 3] {
        let (h0, hs) = spin_chain(sites);
        let n = h0.nrows();
        let sys = QuantumSystem::new(&h0, &hs);
        let layout = layout(2 * n * n, sites);
        let integrator = UnitaryIntegrator::new("x", "a", &sys, &layout).unwrap();
        let z = random_knots(&layout, 2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &z, |b, z| {
            b.iter(|| integrator.jacobian(&z[0], &z[1], 0).unwrap())
        });
    }
    group.finish();
}

pub fn bench_density_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("density_jacobian");
    for &sites in &[1usize, 2] {
        let (h0, hs) = spin_chain(sites);
        let n = h0.nrows();
        let decay: Vec<_> = (0..sites).map(|k| {
            let ops: Vec<_> = (0..sites).map(|i| if i == k { sm() } else { eye(2) }).collect();
            tensor_list(&ops) * c64::new(0.2, 0.0)
        }).collect();
        let sys = OpenQuantumSystem::new(&h0, &hs, &decay);
        let layout = layout(2 * n * n, sites);
        let integrator = DensityOperatorIntegrator::new("x", "a", &sys, &layout).unwrap();
        let z = random_knots(&layout, 2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &z, |b, z| {
            b.iter(|| integrator.jacobian(&z[0], &z[1], 0).unwrap())
        });
    }
    group.finish();
}

pub fn bench_constraint_jacobian(c: &mut Criterion) {
    let (h0, hs) = spin_chain(2);
    let sys = QuantumSystem::new(&h0, &hs);
    let layout = layout(32, 2);
    let constraint = DynamicsConstraint::new(UnitaryIntegrator::new("x", "a", &sys, &layout).unwrap());
    let z = random_knots(&layout, 100);
    c.bench_function("constraint_jacobian_100", |b| {
        b.iter(|| constraint.jacobian(&z).unwrap())
    });
}
