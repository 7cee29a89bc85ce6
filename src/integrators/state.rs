use std::sync::Arc;
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use sprs::CsMat;

use qrs_colloc_core::{HermitianExp, MatrixExp};

use crate::error::{Error, Result};
use crate::layout::TrajectoryLayout;
use crate::options::IntegratorOptions;
use crate::system::{ClosedSystem, Generator};
use super::{drive_jacobian, DriveNames, ExponentialIntegrator, IntegratorConfig, Knot, Timestep};

/// Exact exponential integrator for a lifted pure state
pub struct QuantumStateIntegrator {
    config: IntegratorConfig,
    generator: Arc<dyn Generator>,
    exp: HermitianExp,
}

impl QuantumStateIntegrator {
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
        if dim == 0 || dim % 2 != 0 {
            return Err(Error::StateDimension { name: state.to_owned(), dim, repr: "lifted ket (2n)" });
        }
        let ket_dim = dim / 2;
        if system.levels() != ket_dim {
            return Err(Error::SystemLevels { levels: system.levels(), ket_dim });
        }

        let generator = system.generator();
        config.check_drive_count(generator.n_drives())?;
        if generator.dim() != dim {
            return Err(Error::GeneratorDimension { generator: generator.dim(), expected: dim });
        }

        debug!("QuantumStateIntegrator `{}`: ket_dim={}, drives={}, freetime={}, diff={:?}",
               state, ket_dim, config.n_drives(), config.freetime(), options.diff_mode);
        Ok(Self { config: config.with_ket_dim(ket_dim), generator, exp: options.hermitian_exp() })
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }
}

impl ExponentialIntegrator for QuantumStateIntegrator {
    fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    fn residual(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<DVector<f64>> {
        self.config.check_knots(zt, ztt)?;
        trace!("QuantumStateIntegrator residual at t={}", t);
        let dt = self.config.dt(zt);
        let g = self.generator.eval(self.config.drives(zt));

        let psit = self.config.state(zt);
        let psitt = self.config.state(ztt);
        Ok(psitt - self.exp.expv(&(g * dt), &psit)?)
    }

    fn jacobian(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<CsMat<f64>> {
        self.config.check_knots(zt, ztt)?;
        trace!("QuantumStateIntegrator jacobian at t={}", t);
        let a = self.config.drives(zt);
        let dt = self.config.dt(zt);
        let g = self.generator.eval(a);
        // unthresholded, as in the residual
        let unthresholded = HermitianExp { threshold: 0.0, ..self.exp };
        let eig = unthresholded.decompose(&(&g * dt))?;
        let e = eig.exp();
        let psit = self.config.state(zt);

        let mut jb = self.config.jacobian_builder();
        jb.add_block(0, Knot::Current, self.config.state_components(), &(-&e));

        let da = drive_jacobian(
            &self.config, self.generator.as_ref(), a, dt,
            |dg: &DMatrix<f64>| Ok(eig.frechet(dg)? * &psit),
            |gdt: &DMatrix<f64>| Ok(unthresholded.expv(gdt, &psit)?),
        )?;
        jb.add_block(0, Knot::Current, self.config.drive_components(), &da);

        if let Timestep::Free(idx) = *self.config.timestep() {
            let col = -(&g * eig.expv(&psit)?);
            jb.add_column(Knot::Current, idx, &col);
        }

        Ok(jb.build())
    }
}
