//! Numerical core for exact exponential propagation of lifted quantum objects.
//!
//! Everything here works on the real isomorphic representation: kets,
//! operators and density operators are real vectors, and generators are
//! real matrices acting on them.

extern crate approx;
extern crate nalgebra;
extern crate log;

pub mod error;
pub mod expm;
pub mod iso;
pub mod matrix;
pub mod pauli;

pub use num_complex::Complex64 as c64;
pub use error::ExpmError;
pub use expm::{HermitianEig, HermitianExp, MatrixExp, PadeExp};
