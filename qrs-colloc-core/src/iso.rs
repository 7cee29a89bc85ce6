//! Real isomorphic representations of complex kets, operators and
//! density operators.
//!
//! A ket `ψ` is lifted to `[Re ψ; Im ψ]`. An operator is lifted column by
//! column, so a unitary `U` with `n` columns becomes `n` stacked lifted
//! kets. A density operator is column-stacked first and then lifted as a
//! single ket. A complex matrix `M` acting on kets is lifted to the real
//! block matrix
//!
//! ```text
//!     [ Re M   -Im M ]
//!     [ Im M    Re M ]
//! ```
//!
//! which is an algebra homomorphism, so matrix functions commute with it.

use nalgebra::{DMatrix, DVector};
use crate::c64;

pub fn ket_to_iso(psi: &DVector<c64>) -> DVector<f64> {
    let n = psi.len();
    DVector::from_fn(2 * n, |i, _| if i < n { psi[i].re } else { psi[i - n].im })
}

/// # Panics
/// Panics if `v` has odd length
pub fn iso_to_ket(v: &[f64]) -> DVector<c64> {
    assert!(v.len() % 2 == 0, "iso_to_ket: odd length {}", v.len());
    let n = v.len() / 2;
    DVector::from_fn(n, |i, _| c64::new(v[i], v[n + i]))
}

/// Lifts every column of `u` as a ket and stacks the results
pub fn operator_to_iso_vec(u: &DMatrix<c64>) -> DVector<f64> {
    let (n, m) = u.shape();
    let mut v = DVector::zeros(2 * n * m);
    for (j, col) in u.column_iter().enumerate() {
        for (i, z) in col.iter().enumerate() {
            v[j * 2 * n + i] = z.re;
            v[j * 2 * n + n + i] = z.im;
        }
    }
    v
}

/// # Panics
/// Panics unless `v.len() == 2 n^2` for some `n`
pub fn iso_vec_to_operator(v: &[f64]) -> DMatrix<c64> {
    let n = ((v.len() / 2) as f64).sqrt().round() as usize;
    assert_eq!(2 * n * n, v.len(), "iso_vec_to_operator: length {} is not 2n^2", v.len());
    DMatrix::from_fn(n, n, |i, j| c64::new(v[j * 2 * n + i], v[j * 2 * n + n + i]))
}

/// Column-stacking vectorization
pub fn vectorize(rho: &DMatrix<c64>) -> DVector<c64> {
    DVector::from_column_slice(rho.as_slice())
}

pub fn density_to_iso_vec(rho: &DMatrix<c64>) -> DVector<f64> {
    ket_to_iso(&vectorize(rho))
}

/// # Panics
/// Panics unless `v.len() == 2 n^2` for some `n`
pub fn iso_vec_to_density(v: &[f64]) -> DMatrix<c64> {
    let n = ((v.len() / 2) as f64).sqrt().round() as usize;
    assert_eq!(2 * n * n, v.len(), "iso_vec_to_density: length {} is not 2n^2", v.len());
    let k = iso_to_ket(v);
    DMatrix::from_column_slice(n, n, k.as_slice())
}

/// Lifts a complex matrix acting on kets to the real matrix acting on lifted kets
pub fn iso_operator(m: &DMatrix<c64>) -> DMatrix<f64> {
    let (r, c) = m.shape();
    DMatrix::from_fn(2 * r, 2 * c, |i, j| {
        let z = m[(i % r, j % c)];
        match (i < r, j < c) {
            (true, true) | (false, false) => z.re,
            (true, false) => -z.im,
            (false, true) => z.im,
        }
    })
}

/// Inverse of [`iso_operator`], reading the left block column.
/// The right block column is assumed consistent with the lift.
///
/// # Panics
/// Panics if `a` has an odd number of rows or columns
pub fn iso_operator_to_complex(a: &DMatrix<f64>) -> DMatrix<c64> {
    let (r, c) = a.shape();
    assert!(r % 2 == 0 && c % 2 == 0, "iso_operator_to_complex: odd shape {}x{}", r, c);
    let (r, c) = (r / 2, c / 2);
    DMatrix::from_fn(r, c, |i, j| c64::new(a[(i, j)], a[(r + i, j)]))
}

/// Generator `lift(-iH)` of Schrödinger evolution on lifted kets
pub fn hamiltonian_generator(h: &DMatrix<c64>) -> DMatrix<f64> {
    iso_operator(&h.map(|z| z * -c64::i()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_op() -> DMatrix<c64> {
        DMatrix::from_row_slice(2, 2, &[
            c64::new(1.0, 0.5), c64::new(-0.25, 2.0),
            c64::new(0.0, -1.0), c64::new(3.0, 0.0)])
    }

    #[test]
    fn test_operator_iso_inverse() {
        let u = sample_op();
        let v = operator_to_iso_vec(&u);
        assert_eq!(v.len(), 8);
        // first column lifted as a ket
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 0.5);
        assert_eq!(v[3], -1.0);
        assert_eq!(iso_vec_to_operator(v.as_slice()), u);
    }

    #[test]
    fn test_lift_is_homomorphism() {
        let a = sample_op();
        let b = sample_op().adjoint();
        let lhs = iso_operator(&(&a * &b));
        let rhs = iso_operator(&a) * iso_operator(&b);
        assert_relative_eq!(lhs, rhs, epsilon = 1e-14);

        let psi = DVector::from_vec(vec![c64::new(0.3, -0.1), c64::new(0.0, 2.0)]);
        assert_relative_eq!(ket_to_iso(&(&a * &psi)), iso_operator(&a) * ket_to_iso(&psi),
                            epsilon = 1e-14);
        assert_eq!(iso_operator_to_complex(&iso_operator(&a)), a);
    }

    #[test]
    fn test_density_iso_column_stacking() {
        let rho = sample_op();
        let v = density_to_iso_vec(&rho);
        // vec(rho) = [rho00, rho10, rho01, rho11]
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], -0.25);
        assert_eq!(v[4 + 2], 2.0);
        assert_eq!(iso_vec_to_density(v.as_slice()), rho);
    }
}
