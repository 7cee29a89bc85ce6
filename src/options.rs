use serde::{Deserialize, Serialize};
use qrs_colloc_core::HermitianExp;
use crate::diff::FiniteDifference;

/// How the drive block of the Jacobian is differentiated
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DiffMode {
    /// Fréchet derivative of the matrix exponential along Δt ∂G/∂a_j
    Exact,
    /// Finite differences of the propagated state with respect to the drives
    FiniteDifference(FiniteDifference),
}

impl Default for DiffMode {
    fn default() -> Self {
        DiffMode::Exact
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub diff_mode: DiffMode,
    /// Entries of the Hermitian-strategy exponential below this magnitude are dropped.
    /// Only materialized exponentials are thresholded, so pure-state propagation
    /// ignores it.
    pub expm_threshold: f64,
    /// Tolerated relative deviation of a closed-system generator from a
    /// lifted skew-Hermitian matrix
    pub hermitian_tol: f64,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        let h = HermitianExp::default();
        Self { diff_mode: DiffMode::Exact, expm_threshold: h.threshold, hermitian_tol: h.tol }
    }
}

impl IntegratorOptions {
    pub fn with_diff_mode(mut self, diff_mode: DiffMode) -> Self {
        self.diff_mode = diff_mode;
        self
    }

    pub fn with_expm_threshold(mut self, threshold: f64) -> Self {
        self.expm_threshold = threshold;
        self
    }

    pub fn hermitian_exp(&self) -> HermitianExp {
        HermitianExp::new(self.expm_threshold, self.hermitian_tol)
    }
}
