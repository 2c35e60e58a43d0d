use super::LocalState;
use crate::base::{Journal, MINIMUM_STEP_CUTBACK};
use crate::kinematics::HughesWinget;
use crate::StrError;
use russell_lab::{mat_copy, mat_inverse, vec_copy, Matrix, Vector};
use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Defines the tolerance on the out-of-plane (or lateral) stress residual
const WRAPPER_TOL: f64 = 1e-10;

/// Defines the relaxed tolerance accepted after `WRAPPER_N_RELAX` iterations
const WRAPPER_TOL_RELAXED: f64 = 1e-8;

/// Defines the number of iterations after which the relaxed tolerance applies
const WRAPPER_N_RELAX: usize = 7;

/// Defines the maximum number of iterations before requesting a cutback
const WRAPPER_N_MAX: usize = 13;

/// Defines the maximum magnitude of the out-of-plane compliance
const WRAPPER_MAX_COMPLIANCE: f64 = 1e10;

/// Holds the outcome of a stress update
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Convergence {
    /// The stress update succeeded
    Converged,

    /// The increment must be repeated with the time increment scaled by the given factor
    Cutback(f64),
}

/// Specifies the essential functions of hypoelastic (rate-form) material models
pub trait HypoElasticTrait {
    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize;

    /// Updates the stress given the strain increment and computes the algorithmic tangent
    ///
    /// # Input
    ///
    /// * `state` -- stress and internal values; updated in place
    /// * `dd` -- the algorithmic tangent ∂σ/∂Δε (output)
    /// * `delta_strain` -- the strain increment Δε
    /// * `time_old` -- time at the beginning of the increment
    /// * `dt` -- time increment
    fn compute_stress(
        &mut self,
        state: &mut LocalState,
        dd: &mut Tensor4,
        delta_strain: &Tensor2,
        time_old: f64,
        dt: f64,
    ) -> Result<Convergence, StrError>;
}

/// Updates the stress of a hypoelastic model driven by deformation gradients
///
/// The stress is first rotated by the Hughes-Winget incremental rotation; then the
/// small-strain update is performed with the stretching increment; finally, the
/// derivative of the stress w.r.t. the new deformation gradient is computed.
///
/// # Input
///
/// * `ds_df` -- (6 × 9) ∂σ/∂Fnew with the column of Fₖₗ at `k·3 + l` (output)
pub fn compute_stress_finite_strain<M>(
    model: &mut M,
    state: &mut LocalState,
    ds_df: &mut Matrix,
    ff_old: &Matrix,
    ff_new: &Matrix,
    time_old: f64,
    dt: f64,
) -> Result<Convergence, StrError>
where
    M: HypoElasticTrait + ?Sized,
{
    if state.stress.mandel() != Mandel::Symmetric {
        return Err("finite strain requires a symmetric 3D stress tensor");
    }
    let hw = HughesWinget::new(ff_old, ff_new)?;
    state.stress = hw.rotate_tensor(&state.stress)?;
    let mut dd = Tensor4::new(Mandel::Symmetric);
    let convergence = model.compute_stress(state, &mut dd, hw.strain_increment(), time_old, dt)?;
    if let Convergence::Cutback(_) = convergence {
        return Ok(convergence);
    }
    let mut ff_inv = Matrix::new(3, 3);
    mat_inverse(&mut ff_inv, ff_new)?;
    let res = hw.compute_ds_df(&state.stress, &ff_inv, &dd)?;
    mat_copy(ds_df, &res)?;
    Ok(Convergence::Converged)
}

/// Restores the stress and internal values saved at the beginning of a wrapper call
fn restore(state: &mut LocalState, stress_old: &Tensor2, internal_values_old: &Vector) -> Result<(), StrError> {
    state.stress.set_tensor(1.0, stress_old);
    vec_copy(&mut state.internal_values, internal_values_old)
}

/// Updates the stress of a hypoelastic model under plane-stress conditions
///
/// Newton iterations on the out-of-plane strain Δε₂₂ drive σ₂₂ to zero, starting from
/// the isochoric guess Δε₂₂ = -Δε₀₀ - Δε₁₁. On success, `delta_strain` holds the
/// converged strain increment. On a cutback, the state is returned as given.
pub fn compute_plane_stress<M, J>(
    model: &mut M,
    state: &mut LocalState,
    dd: &mut Tensor4,
    delta_strain: &mut Tensor2,
    time_old: f64,
    dt: f64,
    journal: &J,
) -> Result<Convergence, StrError>
where
    M: HypoElasticTrait + ?Sized,
    J: Journal + ?Sized,
{
    let stress_old = state.stress.clone();
    let internal_values_old = state.internal_values.clone();
    let mut deps = delta_strain.clone();
    {
        let d = deps.vector_mut();
        d[2] = -d[0] - d[1];
    }
    let mut count = 1;
    loop {
        restore(state, &stress_old, &internal_values_old)?;
        let convergence = model.compute_stress(state, dd, &deps, time_old, dt)?;
        if let Convergence::Cutback(_) = convergence {
            restore(state, &stress_old, &internal_values_old)?;
            return Ok(convergence);
        }

        let residual = f64::abs(state.stress.vector()[2]);
        if residual < WRAPPER_TOL || (count > WRAPPER_N_RELAX && residual < WRAPPER_TOL_RELAXED) {
            break;
        }

        let mut compliance = 1.0 / dd.matrix().get(2, 2);
        if compliance.is_nan() || f64::abs(compliance) > WRAPPER_MAX_COMPLIANCE {
            compliance = WRAPPER_MAX_COMPLIANCE;
        }
        deps.vector_mut()[2] -= compliance * state.stress.vector()[2];

        count += 1;
        if count > WRAPPER_N_MAX {
            journal.warn("PlaneStress", "plane-stress wrapper requires cutback");
            restore(state, &stress_old, &internal_values_old)?;
            return Ok(Convergence::Cutback(MINIMUM_STEP_CUTBACK));
        }
    }
    delta_strain.set_tensor(1.0, &deps);
    Ok(Convergence::Converged)
}

/// Updates the stress of a hypoelastic model under uniaxial-stress conditions
///
/// Newton iterations on the lateral strains (Δε₁₁, Δε₂₂) drive (σ₁₁, σ₂₂) to zero,
/// starting from zero lateral strain. On success, `delta_strain` holds the converged
/// strain increment. On a cutback, the state is returned as given.
pub fn compute_uniaxial_stress<M, J>(
    model: &mut M,
    state: &mut LocalState,
    dd: &mut Tensor4,
    delta_strain: &mut Tensor2,
    time_old: f64,
    dt: f64,
    journal: &J,
) -> Result<Convergence, StrError>
where
    M: HypoElasticTrait + ?Sized,
    J: Journal + ?Sized,
{
    let stress_old = state.stress.clone();
    let internal_values_old = state.internal_values.clone();
    let mut deps = delta_strain.clone();
    deps.vector_mut()[1] = 0.0;
    deps.vector_mut()[2] = 0.0;
    let mut kk = Matrix::new(2, 2);
    let mut kk_inv = Matrix::new(2, 2);
    let mut count = 1;
    loop {
        restore(state, &stress_old, &internal_values_old)?;
        let convergence = model.compute_stress(state, dd, &deps, time_old, dt)?;
        if let Convergence::Cutback(_) = convergence {
            restore(state, &stress_old, &internal_values_old)?;
            return Ok(convergence);
        }

        let s1 = state.stress.vector()[1];
        let s2 = state.stress.vector()[2];
        let residual = f64::abs(s1) + f64::abs(s2);
        if residual < WRAPPER_TOL || (count > WRAPPER_N_RELAX && residual < WRAPPER_TOL_RELAXED) {
            break;
        }

        // solve the 2×2 lateral system
        for i in 0..2 {
            for j in 0..2 {
                kk.set(i, j, dd.matrix().get(1 + i, 1 + j));
            }
        }
        mat_inverse(&mut kk_inv, &kk)?;
        let d = deps.vector_mut();
        d[1] -= kk_inv.get(0, 0) * s1 + kk_inv.get(0, 1) * s2;
        d[2] -= kk_inv.get(1, 0) * s1 + kk_inv.get(1, 1) * s2;

        count += 1;
        if count > WRAPPER_N_MAX {
            journal.warn("UniaxialStress", "uniaxial-stress wrapper requires cutback");
            restore(state, &stress_old, &internal_values_old)?;
            return Ok(Convergence::Cutback(MINIMUM_STEP_CUTBACK));
        }
    }
    delta_strain.set_tensor(1.0, &deps);
    Ok(Convergence::Converged)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
