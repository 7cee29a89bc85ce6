use std::sync::Arc;
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use sprs::CsMat;

use qrs_colloc_core::{MatrixExp, PadeExp};

use crate::error::{Error, Result};
use crate::layout::TrajectoryLayout;
use crate::options::IntegratorOptions;
use crate::system::{Generator, OpenSystem};
use super::{drive_jacobian, DriveNames, ExponentialIntegrator, IntegratorConfig, Knot, Timestep};

/// Exact exponential integrator for a lifted, column-stacked density
/// operator under a Lindblad Liouvillian.
///
/// The Liouvillian is not skew-Hermitian, so every exponential goes
/// through the generic [`PadeExp`] strategy.
pub struct DensityOperatorIntegrator {
    config: IntegratorConfig,
    liouvillian: Arc<dyn Generator>,
    exp: PadeExp,
}

impl DensityOperatorIntegrator {
    pub fn new<S, D>(state: &str, drives: D, system: &S, layout: &TrajectoryLayout) -> Result<Self>
    where S: OpenSystem + ?Sized, D: Into<DriveNames> {
        Self::with_options(state, drives, system, layout, IntegratorOptions::default())
    }

    pub fn with_options<S, D>(
        state: &str,
        drives: D,
        system: &S,
        layout: &TrajectoryLayout,
        options: IntegratorOptions,
    ) -> Result<Self>
    where S: OpenSystem + ?Sized, D: Into<DriveNames> {
        let config = IntegratorConfig::from_layout(state, drives.into(), layout, options)?;
        let liouvillian = system.liouvillian();
        config.check_drive_count(liouvillian.n_drives())?;

        let ket_dim = system.hamiltonian(&vec![0.0; liouvillian.n_drives()]).nrows();
        let dim = config.dim();
        if ket_dim == 0 || 2 * ket_dim * ket_dim != dim {
            return Err(Error::StateDimension { name: state.to_owned(), dim, repr: "lifted density (2n^2)" });
        }
        if liouvillian.dim() != dim {
            return Err(Error::GeneratorDimension { generator: liouvillian.dim(), expected: dim });
        }

        debug!("DensityOperatorIntegrator `{}`: ket_dim={}, dim={}, drives={}, freetime={}, diff={:?}",
               state, ket_dim, dim, config.n_drives(), config.freetime(), options.diff_mode);
        Ok(Self { config: config.with_ket_dim(ket_dim), liouvillian, exp: PadeExp })
    }

    pub fn liouvillian(&self) -> &dyn Generator {
        self.liouvillian.as_ref()
    }
}

impl ExponentialIntegrator for DensityOperatorIntegrator {
    fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    fn residual(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<DVector<f64>> {
        self.config.check_knots(zt, ztt)?;
        trace!("DensityOperatorIntegrator residual at t={}", t);
        let dt = self.config.dt(zt);
        let l = self.liouvillian.eval(self.config.drives(zt));

        let rhot = self.config.state(zt);
        let rhott = self.config.state(ztt);
        Ok(rhott - self.exp.expv(&(l * dt), &rhot)?)
    }

    fn jacobian(&self, zt: &[f64], ztt: &[f64], t: usize) -> Result<CsMat<f64>> {
        self.config.check_knots(zt, ztt)?;
        trace!("DensityOperatorIntegrator jacobian at t={}", t);
        let a = self.config.drives(zt);
        let dt = self.config.dt(zt);
        let l = self.liouvillian.eval(a);
        let ldt = &l * dt;
        let e = self.exp.expm(&ldt)?;
        let rhot = self.config.state(zt);

        let mut jb = self.config.jacobian_builder();
        jb.add_block(0, Knot::Current, self.config.state_components(), &(-&e));

        let da = drive_jacobian(
            &self.config, self.liouvillian.as_ref(), a, dt,
            |dl: &DMatrix<f64>| Ok(self.exp.frechet(&ldt, dl)? * &rhot),
            |ldt: &DMatrix<f64>| Ok(self.exp.expm(ldt)? * &rhot),
        )?;
        jb.add_block(0, Knot::Current, self.config.drive_components(), &da);

        if let Timestep::Free(idx) = *self.config.timestep() {
            let col = -(&l * (&e * &rhot));
            jb.add_column(Knot::Current, idx, &col);
        }

        Ok(jb.build())
    }
}
