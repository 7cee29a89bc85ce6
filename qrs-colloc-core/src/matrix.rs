use nalgebra::{ComplexField, DMatrix, DVector, Scalar};
use itertools::Itertools;

/// Computes
/// out[i, j] = f( a[i], b[j] )
pub fn outer_zip_to<N, M, F>(
    a: &DVector<N>,
    b: &DVector<N>,
    out: &mut DMatrix<M>,
    f: F
)
where N: Scalar, M: Scalar, F: Fn(&N, &N) -> M {
    let (nrows, ncols) = out.shape();
    assert!(nrows == a.len() && ncols == b.len(),
            "outer_zip_to Dimensions mismatch");

    for (m, (cb, ca)) in out.as_mut_slice().iter_mut().zip( // Column major iterator
        b.as_slice().iter().cartesian_product(a.as_slice().iter())) {
        *m = f(ca, cb);
    }
}

#[allow(non_snake_case)]
/// Performs U^dag A U
pub fn change_basis<N: ComplexField>(A: &DMatrix<N>, U: &DMatrix<N>) -> DMatrix<N> {
    U.ad_mul(&(A * U))
}

#[allow(non_snake_case)]
/// Performs U A U^dag
pub fn unchange_basis<N: ComplexField>(A: &DMatrix<N>, U: &DMatrix<N>) -> DMatrix<N> {
    U * (A * U.adjoint())
}

/// Maximum absolute column sum
pub fn one_norm(a: &DMatrix<f64>) -> f64 {
    a.column_iter()
        .map(|c| c.iter().map(|x| x.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Zeroes every entry with magnitude below `threshold`
pub fn drop_below(a: &mut DMatrix<f64>, threshold: f64) {
    for x in a.iter_mut().filter(|x| x.abs() < threshold) {
        *x = 0.0;
    }
}

pub fn all_finite(a: &[f64]) -> bool {
    a.iter().all(|x| x.is_finite())
}

/// Applies `I_k ⊗ e` to `x`, where `x` stacks `k` blocks of length `e.ncols()`
///
/// # Panics
/// Panics if `x.len()` is not a multiple of `e.ncols()`
pub fn kron_identity_mul(e: &DMatrix<f64>, x: &[f64]) -> DVector<f64> {
    let m = e.ncols();
    assert!(m > 0 && x.len() % m == 0, "kron_identity_mul: length {} is not a multiple of {}", x.len(), m);
    let blocks = DMatrix::from_column_slice(m, x.len() / m, x);
    let y = e * blocks;
    DVector::from_column_slice(y.as_slice())
}
