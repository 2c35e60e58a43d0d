use super::{Convergence, HypoElasticTrait, LocalState};
use crate::substep::{SubincrementIntegrator, SubincrementOutcome};
use crate::StrError;
use russell_lab::{mat_inverse, mat_mat_mul, Matrix, Vector};
use russell_tensor::{Tensor2, Tensor4};

/// Connects a hypoelastic model to the substepping drivers
///
/// Each subincrement integrates the model with a fraction of the total strain increment.
/// Inelastic subincrements report the local tangent `dX/dY = D · Cel⁻¹`, where `D` is
/// the algorithmic tangent returned by the model and `Cel` is the elastic stiffness.
///
/// The local tangent is (n_stress × n_stress); thus the drivers must be called with
/// `n_tangent` equal to [StrainDriven::n_tangent()].
pub struct StrainDriven<'a, M: HypoElasticTrait + ?Sized> {
    /// Holds the material model
    model: &'a mut M,

    /// Holds the total strain increment Δε
    delta_strain: Tensor2,

    /// Holds the inverse of the elastic stiffness
    cel_inv: Matrix,

    /// Holds the time at the beginning of the increment
    time_old: f64,

    /// Holds the time increment
    dt: f64,

    /// Holds the working state
    work: LocalState,

    /// Holds the strain increment of a subincrement
    work_deps: Tensor2,

    /// Holds the algorithmic tangent of a subincrement
    work_dd: Tensor4,
}

impl<'a, M: HypoElasticTrait + ?Sized> StrainDriven<'a, M> {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `model` -- the material model
    /// * `cel` -- (n_stress × n_stress) elastic stiffness (Mandel basis)
    /// * `delta_strain` -- total strain increment
    /// * `time_old` -- time at the beginning of the increment
    /// * `dt` -- time increment
    pub fn new(model: &'a mut M, cel: &Matrix, delta_strain: &Tensor2, time_old: f64, dt: f64) -> Result<Self, StrError> {
        let mandel = delta_strain.mandel();
        let n_stress = mandel.dim();
        if cel.dims() != (n_stress, n_stress) {
            return Err("the elastic stiffness must be compatible with the strain increment");
        }
        let mut cel_inv = Matrix::new(n_stress, n_stress);
        mat_inverse(&mut cel_inv, cel)?;
        let n_internal_values = model.n_internal_values();
        Ok(StrainDriven {
            model,
            delta_strain: delta_strain.clone(),
            cel_inv,
            time_old,
            dt,
            work: LocalState::new(mandel, n_internal_values),
            work_deps: Tensor2::new(mandel),
            work_dd: Tensor4::new(mandel),
        })
    }

    /// Returns the dimension of the local tangent (the number of stress components)
    pub fn n_tangent(&self) -> usize {
        self.cel_inv.dims().0
    }

    /// Returns the state computed by the last subincrement
    pub fn last_state(&self) -> &LocalState {
        &self.work
    }
}

impl<'a, M: HypoElasticTrait + ?Sized> SubincrementIntegrator for StrainDriven<'a, M> {
    fn integrate(
        &mut self,
        start_stress: &Vector,
        start_state: &Vector,
        fraction: f64,
        progress_start: f64,
    ) -> Result<SubincrementOutcome, StrError> {
        self.work.set_from_vectors(start_stress, start_state)?;
        self.work_deps.set_tensor(fraction, &self.delta_strain);
        let time = self.time_old + progress_start * self.dt;
        let convergence = self.model.compute_stress(
            &mut self.work,
            &mut self.work_dd,
            &self.work_deps,
            time,
            fraction * self.dt,
        )?;
        if let Convergence::Cutback(new_dt) = convergence {
            return Ok(SubincrementOutcome::Cutback(new_dt));
        }
        let stress = self.work.stress.vector().clone();
        if self.work.elastic {
            return Ok(SubincrementOutcome::Elastic { stress });
        }
        let n_stress = stress.dim();
        let mut local_tangent = Matrix::new(n_stress, n_stress);
        mat_mat_mul(&mut local_tangent, 1.0, self.work_dd.matrix(), &self.cel_inv, 0.0)?;
        Ok(SubincrementOutcome::Inelastic {
            stress,
            state: self.work.internal_values.clone(),
            local_tangent,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
