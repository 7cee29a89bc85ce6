//! Superoperators on column-stacked density operators.
//!
//! With column stacking, vec(A ρ B) = (B^T ⊗ A) vec(ρ). The Lindblad
//! equation
//!     dρ/dt = -i[H, ρ] + Σ_k ( L_k ρ L_k^dag - ½{L_k^dag L_k, ρ} )
//! becomes the complex Liouvillian
//!     -i(I ⊗ H - H^T ⊗ I) + Σ_k ( conj(L_k) ⊗ L_k - ½ I ⊗ L_k^dag L_k - ½ (L_k^dag L_k)^T ⊗ I )

use nalgebra::DMatrix;
use qrs_colloc_core::c64;

/// -i(I ⊗ H - H^T ⊗ I)
pub fn hamiltonian_superop(h: &DMatrix<c64>) -> DMatrix<c64> {
    let n = h.nrows();
    let id = DMatrix::<c64>::identity(n, n);
    (id.kronecker(h) - h.transpose().kronecker(&id)) * -c64::i()
}

/// Dissipator of a single jump operator
pub fn lindblad_dissipator(l: &DMatrix<c64>) -> DMatrix<c64> {
    let n = l.nrows();
    let id = DMatrix::<c64>::identity(n, n);
    let ldl = l.ad_mul(l);
    let half = c64::new(0.5, 0.0);
    l.conjugate().kronecker(l)
        - id.kronecker(&ldl) * half
        - ldl.transpose().kronecker(&id) * half
}

pub fn liouvillian(h: &DMatrix<c64>, dissipators: &[DMatrix<c64>]) -> DMatrix<c64> {
    dissipators.iter()
        .fold(hamiltonian_superop(h), |acc, l| acc + lindblad_dissipator(l))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qrs_colloc_core::iso::vectorize;
    use qrs_colloc_core::pauli::{sm, sx, sz};

    fn sample_rho() -> DMatrix<c64> {
        DMatrix::from_row_slice(2, 2, &[
            c64::new(0.7, 0.0), c64::new(0.1, -0.2),
            c64::new(0.1, 0.2), c64::new(0.3, 0.0)])
    }

    #[test]
    fn test_superop_matches_lindblad_rhs() {
        let h = sz() + sx() * c64::new(0.4, 0.0);
        let l = sm() * c64::new(0.3, 0.0);
        let rho = sample_rho();
        let rhs = (&h * &rho - &rho * &h) * -c64::i()
            + &l * &rho * l.adjoint()
            - (l.ad_mul(&l) * &rho + &rho * l.ad_mul(&l)) * c64::new(0.5, 0.0);

        let lv = liouvillian(&h, &[l]) * vectorize(&rho);
        assert_relative_eq!(lv, vectorize(&rhs), epsilon = 1e-14);
    }

    #[test]
    fn test_liouvillian_preserves_trace() {
        let l = liouvillian(&sz(), &[sm()]);
        let drho = l * vectorize(&sample_rho());
        let tr = drho[0] + drho[3];
        assert!(tr.norm() < 1e-14);
    }
}
