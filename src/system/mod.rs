//! Quantum system descriptions supplying the generators consumed by the
//! exponential integrators.

use std::sync::Arc;
use nalgebra::DMatrix;
use qrs_colloc_core::c64;
use qrs_colloc_core::iso::{hamiltonian_generator, iso_operator, iso_operator_to_complex};

mod generator;
pub mod liouville;

pub use generator::{FnGenerator, Generator, LinearGenerator, GENERATOR_DIFF_STEP};

/// A closed system evolving under a Hamiltonian-derived generator on
/// lifted kets
pub trait ClosedSystem {
    fn generator(&self) -> Arc<dyn Generator>;

    /// Dimension of the complex ket space
    fn levels(&self) -> usize;

    fn n_drives(&self) -> usize {
        self.generator().n_drives()
    }
}

/// An open system evolving under a Liouvillian on lifted, column-stacked
/// density operators
pub trait OpenSystem {
    fn liouvillian(&self) -> Arc<dyn Generator>;

    fn hamiltonian(&self, a: &[f64]) -> DMatrix<c64>;

    fn n_drives(&self) -> usize {
        self.liouvillian().n_drives()
    }
}

#[derive(Clone)]
pub struct QuantumSystem {
    generator: Arc<dyn Generator>,
    levels: usize,
}

impl QuantumSystem {
    /// H(a) = H_drift + Σ_j a_j H_j
    ///
    /// # Panics
    /// Panics if the Hamiltonians are not square matrices of a common size
    pub fn new(h_drift: &DMatrix<c64>, h_drives: &[DMatrix<c64>]) -> Self {
        let generator = LinearGenerator::new(
            hamiltonian_generator(h_drift),
            h_drives.iter().map(hamiltonian_generator).collect());
        Self { generator: Arc::new(generator), levels: h_drift.nrows() }
    }

    /// From a generator already in the lifted representation
    pub fn from_generator<G: Generator + 'static>(levels: usize, generator: G) -> Self {
        Self { generator: Arc::new(generator), levels }
    }

    /// H(a), recovered from the lifted generator lift(-iH(a))
    pub fn hamiltonian(&self, a: &[f64]) -> DMatrix<c64> {
        iso_operator_to_complex(&self.generator.eval(a)) * c64::i()
    }
}

impl ClosedSystem for QuantumSystem {
    fn generator(&self) -> Arc<dyn Generator> {
        Arc::clone(&self.generator)
    }

    fn levels(&self) -> usize {
        self.levels
    }
}

#[derive(Clone)]
pub struct OpenQuantumSystem {
    h_drift: DMatrix<c64>,
    h_drives: Vec<DMatrix<c64>>,
    dissipators: Vec<DMatrix<c64>>,
    liouvillian: Arc<dyn Generator>,
}

impl OpenQuantumSystem {
    /// Lindblad dynamics with H(a) = H_drift + Σ_j a_j H_j and the given
    /// jump operators
    ///
    /// # Panics
    /// Panics if the operators are not square matrices of a common size
    pub fn new(h_drift: &DMatrix<c64>, h_drives: &[DMatrix<c64>], dissipators: &[DMatrix<c64>]) -> Self {
        let drift = iso_operator(&liouville::liouvillian(h_drift, dissipators));
        let drives = h_drives.iter()
            .map(|h| iso_operator(&liouville::hamiltonian_superop(h)))
            .collect();
        Self {
            h_drift: h_drift.clone(),
            h_drives: h_drives.to_vec(),
            dissipators: dissipators.to_vec(),
            liouvillian: Arc::new(LinearGenerator::new(drift, drives)),
        }
    }

    pub fn dissipators(&self) -> &[DMatrix<c64>] {
        &self.dissipators
    }
}

impl OpenSystem for OpenQuantumSystem {
    fn liouvillian(&self) -> Arc<dyn Generator> {
        Arc::clone(&self.liouvillian)
    }

    fn hamiltonian(&self, a: &[f64]) -> DMatrix<c64> {
        let mut h = self.h_drift.clone();
        for (hj, &aj) in self.h_drives.iter().zip(a.iter()) {
            h += hj * c64::new(aj, 0.0);
        }
        h
    }

    fn n_drives(&self) -> usize {
        self.h_drives.len()
    }
}
