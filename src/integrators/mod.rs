//! Exact exponential integrators.
//!
//! Each integrator enforces, between knot points z_t and z_{t+1},
//!
//! ```text
//! r = x_{t+1} - exp(Δt_t G(a_t)) x_t = 0
//! ```
//!
//! for a lifted quantum object x, and supplies the sparse Jacobian of r with
//! respect to (z_t, z_{t+1}). The variants differ in what x is and in which
//! exponential strategy applies:
//!
//!  * [`UnitaryIntegrator`]: x stacks the lifted columns of a unitary, so the
//!    propagator acts as I ⊗ exp(Δt G) (Hermitian strategy)
//!  * [`QuantumStateIntegrator`]: x is a lifted ket (Hermitian strategy)
//!  * [`DensityOperatorIntegrator`]: x is a lifted, column-stacked density
//!    operator and G is a Liouvillian (generic Padé strategy)
//!
//! Integrators are immutable after construction and hold no state between
//! calls, so one instance may serve every time index concurrently.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sprs::CsMat;

use crate::diff::Differentiator;
use crate::error::{Error, Result};
use crate::layout::{TimestepSpec, TrajectoryLayout};
use crate::options::{DiffMode, IntegratorOptions};
use crate::system::Generator;

mod density;
mod jacobian;
mod state;
mod unitary;

pub use density::DensityOperatorIntegrator;
pub use jacobian::{sparse_to_dense, JacobianBuilder, Knot};
pub use state::QuantumStateIntegrator;
pub use unitary::UnitaryIntegrator;

/// One drive variable name, or several concatenated in order
#[derive(Clone, Debug, PartialEq)]
pub struct DriveNames(pub Vec<String>);

impl From<&str> for DriveNames {
    fn from(name: &str) -> Self {
        DriveNames(vec![name.to_owned()])
    }
}

impl From<Vec<&str>> for DriveNames {
    fn from(names: Vec<&str>) -> Self {
        DriveNames(names.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for DriveNames {
    fn from(names: &[&str]) -> Self {
        DriveNames(names.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<(&str, &str)> for DriveNames {
    fn from(names: (&str, &str)) -> Self {
        DriveNames(vec![names.0.to_owned(), names.1.to_owned()])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Timestep {
    Fixed(f64),
    /// Index of the timestep inside each knot point
    Free(usize),
}

/// Index sets needed to wire an integrator into a larger constraint system
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintComponents {
    pub state: Vec<usize>,
    pub drives: Vec<usize>,
    /// Present only when the timestep is a trajectory variable
    pub timestep: Option<Vec<usize>>,
}

/// Immutable layout and dimensions shared by all integrator variants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    state_name: String,
    drive_names: Vec<String>,
    state_components: Vec<usize>,
    drive_components: Vec<usize>,
    timestep_name: Option<String>,
    timestep: Timestep,
    n_drives: usize,
    ket_dim: usize,
    dim: usize,
    z_dim: usize,
    options: IntegratorOptions,
}

impl IntegratorConfig {
    /// Reads the index sets of `state` and `drives` from the layout.
    /// `ket_dim` is set by the variant once it has validated the state dimension.
    pub(crate) fn from_layout(
        state: &str,
        drives: DriveNames,
        layout: &TrajectoryLayout,
        options: IntegratorOptions,
    ) -> Result<Self> {
        let state_components = layout.component(state)?;
        let mut drive_components = Vec::new();
        for name in drives.0.iter() {
            drive_components.extend(layout.component(name)?);
        }
        if drive_components.windows(2).any(|w| w[1] != w[0] + 1) {
            return Err(Error::NonContiguousDrives(drive_components));
        }

        let (timestep_name, timestep) = match (layout.timestep(), layout.timestep_index()?) {
            (TimestepSpec::Variable(name), Some(idx)) => (Some(name.clone()), Timestep::Free(idx)),
            (TimestepSpec::Variable(name), None) => return Err(Error::TimestepComponent(name.clone())),
            (TimestepSpec::Fixed(dt), _) => (None, Timestep::Fixed(*dt)),
        };

        Ok(Self {
            state_name: state.to_owned(),
            drive_names: drives.0,
            dim: state_components.len(),
            n_drives: drive_components.len(),
            state_components,
            drive_components,
            timestep_name,
            timestep,
            ket_dim: 0,
            z_dim: layout.dim(),
            options,
        })
    }

    pub(crate) fn with_ket_dim(mut self, ket_dim: usize) -> Self {
        self.ket_dim = ket_dim;
        self
    }

    pub(crate) fn check_drive_count(&self, system_drives: usize) -> Result<()> {
        if system_drives != self.n_drives {
            return Err(Error::DriveCount { system: system_drives, components: self.n_drives });
        }
        Ok(())
    }

    pub fn state_name(&self) -> &str {
        &self.state_name
    }

    pub fn drive_names(&self) -> &[String] {
        &self.drive_names
    }

    pub fn state_components(&self) -> &[usize] {
        &self.state_components
    }

    pub fn drive_components(&self) -> &[usize] {
        &self.drive_components
    }

    pub fn timestep(&self) -> &Timestep {
        &self.timestep
    }

    pub fn freetime(&self) -> bool {
        matches!(self.timestep, Timestep::Free(_))
    }

    pub fn n_drives(&self) -> usize {
        self.n_drives
    }

    pub fn ket_dim(&self) -> usize {
        self.ket_dim
    }

    /// Residual (state) dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Knot-point dimension
    pub fn z_dim(&self) -> usize {
        self.z_dim
    }

    pub fn options(&self) -> &IntegratorOptions {
        &self.options
    }

    pub(crate) fn check_knots(&self, zt: &[f64], ztt: &[f64]) -> Result<()> {
        for z in [zt, ztt].iter() {
            if z.len() != self.z_dim {
                return Err(Error::KnotPointLength { expected: self.z_dim, actual: z.len() });
            }
        }
        Ok(())
    }

    pub(crate) fn state(&self, z: &[f64]) -> DVector<f64> {
        DVector::from_iterator(self.dim, self.state_components.iter().map(|&i| z[i]))
    }

    /// Drives are contiguous, so they are a subslice of the knot point
    pub(crate) fn drives<'z>(&self, z: &'z [f64]) -> &'z [f64] {
        match self.drive_components.first() {
            Some(&start) => &z[start..start + self.n_drives],
            None => &[],
        }
    }

    pub(crate) fn dt(&self, z: &[f64]) -> f64 {
        match self.timestep {
            Timestep::Fixed(dt) => dt,
            Timestep::Free(idx) => z[idx],
        }
    }

    pub(crate) fn jacobian_builder(&self) -> JacobianBuilder {
        let mut jb = JacobianBuilder::new(self.dim, self.z_dim);
        jb.add_identity(Knot::Next, &self.state_components);
        jb
    }

    /// Looks the stored component names up again in `layout`
    pub fn components(&self, layout: &TrajectoryLayout) -> Result<ConstraintComponents> {
        let state = layout.component(&self.state_name)?;
        let mut drives = Vec::new();
        for name in self.drive_names.iter() {
            drives.extend(layout.component(name)?);
        }
        let timestep = match &self.timestep_name {
            Some(name) if self.freetime() => Some(layout.component(name)?),
            _ => None,
        };
        Ok(ConstraintComponents { state, drives, timestep })
    }
}

/// Drive block -∂/∂a [exp(Δt G(a)) x] of the Jacobian.
///
/// `frechet_action(E)` must return L(Δt G(a), E) x, the Fréchet derivative of
/// the propagator in direction E applied to the state. `propagate(A)` must
/// return exp(A) x; it is only used by the finite difference mode.
pub(crate) fn drive_jacobian<F, P>(
    config: &IntegratorConfig,
    generator: &dyn Generator,
    a: &[f64],
    dt: f64,
    frechet_action: F,
    propagate: P,
) -> Result<DMatrix<f64>>
where F: Fn(&DMatrix<f64>) -> Result<DVector<f64>>,
      P: Fn(&DMatrix<f64>) -> Result<DVector<f64>>
{
    match config.options().diff_mode {
        DiffMode::Exact => {
            let mut da = DMatrix::zeros(config.dim(), config.n_drives());
            for j in 0..config.n_drives() {
                let col = frechet_action(&(generator.drive_derivative(a, j) * dt))?;
                da.set_column(j, &(-col));
            }
            Ok(da)
        }
        DiffMode::FiniteDifference(fd) => {
            let f = |a: &DVector<f64>| -> Result<DVector<f64>> {
                Ok(-propagate(&(generator.eval(a.as_slice()) * dt))?)
            };
            fd.jacobian(f, &DVector::from_column_slice(a))
        }
    }
}

/// Residual, Jacobian and layout access shared by the three integrator variants
pub trait ExponentialIntegrator: Send + Sync {
    fn config(&self) -> &IntegratorConfig;

    /// x_{t+1} - exp(Δt G(a)) x_t, of length `dim()`
    fn residual(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<DVector<f64>>;

    /// Sparse dim x (2 z_dim) Jacobian of the residual with respect to (z_t, z_{t+1})
    fn jacobian(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<CsMat<f64>>;

    fn dim(&self) -> usize {
        self.config().dim()
    }

    fn z_dim(&self) -> usize {
        self.config().z_dim()
    }

    fn get_comps(&self, layout: &TrajectoryLayout) -> Result<ConstraintComponents> {
        self.config().components(layout)
    }
}
