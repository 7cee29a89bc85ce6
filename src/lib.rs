//! Exact exponential integrators for quantum trajectory optimization.
//!
//! Residuals and sparse Jacobians of the constraint
//! x_{t+1} = exp(Δt G(a_t)) x_t between adjacent knot points, for lifted
//! unitaries, pure states and density operators.
extern crate approx;
extern crate nalgebra;
extern crate log;

pub use qrs_colloc_core::{HermitianExp, MatrixExp, PadeExp};
pub use qrs_colloc_core::c64;

pub mod constraint;
pub mod diff;
pub mod error;
pub mod integrators;
pub mod layout;
pub mod options;
pub mod system;

pub use constraint::DynamicsConstraint;
pub use error::{Error, Result};
pub use integrators::{
    ConstraintComponents, DensityOperatorIntegrator, ExponentialIntegrator, IntegratorConfig,
    QuantumStateIntegrator, Timestep, UnitaryIntegrator,
};
pub use layout::{TimestepSpec, TrajectoryLayout};
pub use options::{DiffMode, IntegratorOptions};
pub use system::{ClosedSystem, OpenQuantumSystem, OpenSystem, QuantumSystem};
