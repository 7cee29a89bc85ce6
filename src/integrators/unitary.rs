use std::sync::Arc;
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use sprs::CsMat;

use qrs_colloc_core::matrix::kron_identity_mul;
use qrs_colloc_core::{HermitianExp, MatrixExp};

use crate::error::{Error, Result};
use crate::layout::TrajectoryLayout;
use crate::options::IntegratorOptions;
use crate::system::{ClosedSystem, Generator};
use super::{drive_jacobian, DriveNames, ExponentialIntegrator, IntegratorConfig, Knot, Timestep};

/// Exact exponential integrator for a lifted unitary.
///
/// The state stacks the n lifted columns of U, each of length 2n, so the
/// propagator is I_n ⊗ exp(Δt G(a)) and acts on every column block alike.
pub struct UnitaryIntegrator {
    config: IntegratorConfig,
    generator: Arc<dyn Generator>,
    exp: HermitianExp,
}

impl UnitaryIntegrator {
    pub fn new<S, D>(state: &str, drives: D, system: &S, layout: &TrajectoryLayout) -> Result<Self>
    where S: ClosedSystem + ?Sized, D: Into<DriveNames> {
        Self::with_options(state, drives, system, layout, IntegratorOptions::default())
    }

    pub fn with_options<S, D>(
        state: &str,
        drives: D,
        system: &S,
        layout: &TrajectoryLayout,
        options: IntegratorOptions,
    ) -> Result<Self>
    where S: ClosedSystem + ?Sized, D: Into<DriveNames> {
        let config = IntegratorConfig::from_layout(state, drives.into(), layout, options)?;
        let dim = config.dim();
        let ket_dim = ((dim / 2) as f64).sqrt().round() as usize;
        if ket_dim == 0 || 2 * ket_dim * ket_dim != dim {
            return Err(Error::StateDimension { name: state.to_owned(), dim, repr: "lifted unitary (2n^2)" });
        }
        if system.levels() != ket_dim {
            return Err(Error::SystemLevels { levels: system.levels(), ket_dim });
        }

        let generator = system.generator();
        config.check_drive_count(generator.n_drives())?;
        if generator.dim() != 2 * ket_dim {
            return Err(Error::GeneratorDimension { generator: generator.dim(), expected: 2 * ket_dim });
        }

        debug!("UnitaryIntegrator `{}`: ket_dim={}, dim={}, drives={}, freetime={}, diff={:?}",
               state, ket_dim, dim, config.n_drives(), config.freetime(), options.diff_mode);
        Ok(Self { config: config.with_ket_dim(ket_dim), generator, exp: options.hermitian_exp() })
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }
}

impl ExponentialIntegrator for UnitaryIntegrator {
    fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    fn residual(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<DVector<f64>> {
        self.config.check_knots(zt, ztt)?;
        trace!("UnitaryIntegrator residual at t={}", t);
        let dt = self.config.dt(zt);
        let g = self.generator.eval(self.config.drives(zt));
        let e = self.exp.expm(&(g * dt))?;

        let ut = self.config.state(zt);
        let utt = self.config.state(ztt);
        Ok(utt - kron_identity_mul(&e, ut.as_slice()))
    }

    fn jacobian(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<CsMat<f64>> {
        self.config.check_knots(zt, ztt)?;
        trace!("UnitaryIntegrator jacobian at t={}", t);
        let a = self.config.drives(zt);
        let dt = self.config.dt(zt);
        let g = self.generator.eval(a);
        let eig = self.exp.decompose(&(&g * dt))?;
        let e = eig.exp();
        let ut = self.config.state(zt);

        let mut jb = self.config.jacobian_builder();

        // ∂/∂U_t = -(I ⊗ exp(Δt G))
        let n2 = 2 * self.config.ket_dim();
        let neg_e = -&e;
        for (c, cols) in self.config.state_components().chunks(n2).enumerate() {
            jb.add_block(c * n2, Knot::Current, cols, &neg_e);
        }

        let unthresholded = HermitianExp { threshold: 0.0, ..self.exp };
        let da = drive_jacobian(
            &self.config, self.generator.as_ref(), a, dt,
            |dg: &DMatrix<f64>| Ok(kron_identity_mul(&eig.frechet(dg)?, ut.as_slice())),
            |gdt: &DMatrix<f64>| Ok(kron_identity_mul(&unthresholded.expm(gdt)?, ut.as_slice())),
        )?;
        jb.add_block(0, Knot::Current, self.config.drive_components(), &da);

        // d/dΔt exp(Δt G) = G exp(Δt G)
        if let Timestep::Free(idx) = *self.config.timestep() {
            let col = -kron_identity_mul(&(&g * &e), ut.as_slice());
            jb.add_column(Knot::Current, idx, &col);
        }

        Ok(jb.build())
    }
}
