use nalgebra::DMatrix;
use smallvec::SmallVec;

/// Step of the central difference used by the default drive derivative
pub const GENERATOR_DIFF_STEP: f64 = 1.0e-5;

/// A drive-dependent generator acting on a lifted real vector space.
///
/// Implementations must be pure: the same drive vector always produces the
/// same matrix, and evaluation never mutates shared state, since one
/// generator serves every time step and may be called concurrently.
pub trait Generator: Send + Sync {
    fn n_drives(&self) -> usize;

    /// Size of the square matrices returned by `eval`
    fn dim(&self) -> usize;

    fn eval(&self, a: &[f64]) -> DMatrix<f64>;

    /// ∂G/∂a_j at `a`
    ///
    /// The default is a central difference of `eval`, which is exact up to
    /// rounding for generators affine in the drives.
    fn drive_derivative(&self, a: &[f64], j: usize) -> DMatrix<f64> {
        let h = GENERATOR_DIFF_STEP * a[j].abs().max(1.0);
        let mut ap: SmallVec<[f64; 8]> = SmallVec::from_slice(a);
        let mut am: SmallVec<[f64; 8]> = SmallVec::from_slice(a);
        ap[j] += h;
        am[j] -= h;
        (self.eval(&ap) - self.eval(&am)) / (2.0 * h)
    }
}

/// G(a) = G_0 + Σ_j a_j G_j
#[derive(Clone, Debug)]
pub struct LinearGenerator {
    pub drift: DMatrix<f64>,
    pub drives: Vec<DMatrix<f64>>,
}

impl LinearGenerator {
    /// # Panics
    /// Panics if the drive terms do not share the shape of the square drift
    pub fn new(drift: DMatrix<f64>, drives: Vec<DMatrix<f64>>) -> Self {
        assert!(drift.is_square(), "LinearGenerator drift must be square");
        for g in drives.iter() {
            assert_eq!(g.shape(), drift.shape(), "LinearGenerator term shape mismatch");
        }
        Self { drift, drives }
    }

    pub fn eval_to(&self, a: &[f64], to_op: &mut DMatrix<f64>) {
        to_op.copy_from(&self.drift);
        for (g, &aj) in self.drives.iter().zip(a.iter()) {
            *to_op += g * aj;
        }
    }
}

impl Generator for LinearGenerator {
    fn n_drives(&self) -> usize {
        self.drives.len()
    }

    fn dim(&self) -> usize {
        self.drift.nrows()
    }

    fn eval(&self, a: &[f64]) -> DMatrix<f64> {
        let mut op = self.drift.clone();
        self.eval_to(a, &mut op);
        op
    }

    fn drive_derivative(&self, _a: &[f64], j: usize) -> DMatrix<f64> {
        self.drives[j].clone()
    }
}

/// Wraps an arbitrary reentrant closure as a generator
pub struct FnGenerator<F> {
    f: F,
    n_drives: usize,
    dim: usize,
}

impl<F> FnGenerator<F>
where F: Fn(&[f64]) -> DMatrix<f64> + Send + Sync {
    pub fn new(n_drives: usize, dim: usize, f: F) -> Self {
        Self { f, n_drives, dim }
    }
}

impl<F> Generator for FnGenerator<F>
where F: Fn(&[f64]) -> DMatrix<f64> + Send + Sync {
    fn n_drives(&self) -> usize {
        self.n_drives
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn eval(&self, a: &[f64]) -> DMatrix<f64> {
        (self.f)(a)
    }
}
