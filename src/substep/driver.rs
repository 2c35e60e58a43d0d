use super::{AdaptiveSubstepper, FixedStepSubstepper, TimeVariantSubstepper};
use crate::base::{Journal, ParamSubstep, MINIMUM_STEP_CUTBACK};
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Holds the name used in diagnostic messages
const NAME: &str = "Driver";

/// Holds the outcome of integrating the material over one subincrement
#[derive(Clone, Debug)]
pub enum SubincrementOutcome {
    /// The response was purely elastic
    Elastic {
        /// Resulting stress
        stress: Vector,
    },

    /// The response was inelastic
    Inelastic {
        /// Resulting stress
        stress: Vector,

        /// Resulting integration-dependent state variables
        state: Vector,

        /// Local tangent dX/dY of the subincrement (n_tangent × n_tangent)
        local_tangent: Matrix,
    },

    /// The local return mapping did not converge; a smaller subincrement must be tried
    NotConverged,

    /// The whole increment must be repeated with the time increment scaled by the given factor
    Cutback(f64),
}

/// Integrates the material response over a subincrement (e.g., by a return-mapping algorithm)
pub trait SubincrementIntegrator {
    /// Integrates the material over a subincrement
    ///
    /// # Input
    ///
    /// * `start_stress` -- stress at the beginning of the subincrement
    /// * `start_state` -- integration-dependent state at the beginning of the subincrement
    /// * `fraction` -- size of the subincrement as a fraction of the total increment
    /// * `progress_start` -- fraction of the total increment at the beginning of the subincrement
    fn integrate(
        &mut self,
        start_stress: &Vector,
        start_state: &Vector,
        fraction: f64,
        progress_start: f64,
    ) -> Result<SubincrementOutcome, StrError>;
}

/// Holds the results of a completed increment
#[derive(Clone, Debug)]
pub struct IncrementResults {
    /// Final stress
    pub stress: Vector,

    /// Final integration-dependent state variables
    pub state: Vector,

    /// Consistent algorithmic stiffness (n_stress × n_stress)
    pub stiffness: Matrix,

    /// Number of calls to the integrator
    pub n_calls: usize,

    /// Indicates that some subincrement was accepted with the error above the tolerance
    pub accuracy_degraded: bool,
}

/// Holds the outcome of integrating a whole increment
#[derive(Clone, Debug)]
pub enum IncrementOutcome {
    /// The increment has been completed
    Finished(IncrementResults),

    /// The increment must be repeated with the time increment scaled by the given factor
    Cutback(f64),
}

/// Checks the number of calls against the maximum
fn too_many_calls<J: Journal>(journal: &J, n_calls: usize, param: &ParamSubstep) -> bool {
    if n_calls > param.n_max_substeps {
        journal.warn(
            NAME,
            &format!("the number of subincrements exceeded {}", param.n_max_substeps),
        );
        return true;
    }
    false
}

/// Integrates an increment with the fixed-step substepper
///
/// # Input
///
/// * `param` -- substepping parameters
/// * `cel` -- (n_stress × n_stress) elastic stiffness
/// * `n_tangent` -- dimension of the material tangent (≥ n_stress)
/// * `stress_old` -- stress at the beginning of the increment
/// * `state_old` -- integration-dependent state at the beginning of the increment
/// * `integrator` -- integrates the material over each subincrement
/// * `journal` -- receives diagnostic messages
pub fn run_fixed_step<I, J>(
    param: &ParamSubstep,
    cel: &Matrix,
    n_tangent: usize,
    stress_old: &Vector,
    state_old: &Vector,
    integrator: &mut I,
    journal: J,
) -> Result<IncrementOutcome, StrError>
where
    I: SubincrementIntegrator + ?Sized,
    J: Journal,
{
    let mut sub = FixedStepSubstepper::new(param, cel, n_tangent, journal)?;
    let mut stress = stress_old.clone();
    let mut state = state_old.clone();
    let mut n_calls = 0;
    while !sub.is_finished() {
        n_calls += 1;
        if too_many_calls(sub.journal(), n_calls, param) {
            return Ok(IncrementOutcome::Cutback(MINIMUM_STEP_CUTBACK));
        }
        let size = sub.next_substep();
        let progress_start = sub.progress() - size;
        match integrator.integrate(&stress, &state, size, progress_start)? {
            SubincrementOutcome::Elastic { stress: new_stress } => {
                stress = new_stress;
                sub.finish_elastic_substep()?;
            }
            SubincrementOutcome::Inelastic {
                stress: new_stress,
                state: new_state,
                local_tangent,
            } => {
                stress = new_stress;
                state = new_state;
                sub.finish_substep(&local_tangent)?;
            }
            SubincrementOutcome::NotConverged => {
                if !sub.decrease_substep_size() {
                    return Ok(IncrementOutcome::Cutback(MINIMUM_STEP_CUTBACK));
                }
            }
            SubincrementOutcome::Cutback(new_dt) => return Ok(IncrementOutcome::Cutback(new_dt)),
        }
    }
    Ok(IncrementOutcome::Finished(IncrementResults {
        stress,
        state,
        stiffness: sub.consistent_stiffness()?,
        n_calls,
        accuracy_degraded: false,
    }))
}

/// Integrates an increment with the time-variant substepper
///
/// `elastic_at(progress)` returns the elastic stiffness at the beginning of each subincrement.
///
/// # Input
///
/// * `param` -- substepping parameters
/// * `n_tangent` -- dimension of the material tangent (≥ n_stress)
/// * `stress_old` -- stress at the beginning of the increment (defines n_stress)
/// * `state_old` -- integration-dependent state at the beginning of the increment
/// * `elastic_at` -- returns the elastic stiffness at a given fraction of the increment
/// * `integrator` -- integrates the material over each subincrement
/// * `journal` -- receives diagnostic messages
pub fn run_time_variant<F, I, J>(
    param: &ParamSubstep,
    n_tangent: usize,
    stress_old: &Vector,
    state_old: &Vector,
    mut elastic_at: F,
    integrator: &mut I,
    journal: J,
) -> Result<IncrementOutcome, StrError>
where
    F: FnMut(f64) -> Result<Matrix, StrError>,
    I: SubincrementIntegrator + ?Sized,
    J: Journal,
{
    let mut sub = TimeVariantSubstepper::new(param, stress_old.dim(), n_tangent, journal)?;
    let mut stress = stress_old.clone();
    let mut state = state_old.clone();
    let mut n_calls = 0;
    while !sub.is_finished() {
        n_calls += 1;
        if too_many_calls(sub.journal(), n_calls, param) {
            return Ok(IncrementOutcome::Cutback(MINIMUM_STEP_CUTBACK));
        }
        let size = sub.next_substep();
        let progress_start = sub.finished_progress();
        match integrator.integrate(&stress, &state, size, progress_start)? {
            SubincrementOutcome::Elastic { stress: new_stress } => {
                stress = new_stress;
                let cel_t = elastic_at(progress_start)?;
                sub.extend_consistent_tangent(&cel_t)?;
            }
            SubincrementOutcome::Inelastic {
                stress: new_stress,
                state: new_state,
                local_tangent,
            } => {
                stress = new_stress;
                state = new_state;
                let cel_t = elastic_at(progress_start)?;
                sub.extend_consistent_tangent_with(&cel_t, &local_tangent)?;
            }
            SubincrementOutcome::NotConverged => {
                if !sub.decrease_substep_size() {
                    return Ok(IncrementOutcome::Cutback(MINIMUM_STEP_CUTBACK));
                }
            }
            SubincrementOutcome::Cutback(new_dt) => return Ok(IncrementOutcome::Cutback(new_dt)),
        }
    }
    Ok(IncrementOutcome::Finished(IncrementResults {
        stress,
        state,
        stiffness: sub.consistent_stiffness()?,
        n_calls,
        accuracy_degraded: false,
    }))
}

/// Integrates an increment with the adaptive (step-doubling) substepper
///
/// # Input
///
/// * `param` -- substepping parameters
/// * `cel` -- (n_stress × n_stress) elastic stiffness
/// * `n_tangent` -- dimension of the material tangent (≥ n_stress)
/// * `stress_old` -- stress at the beginning of the increment
/// * `state_old` -- integration-dependent state at the beginning of the increment
/// * `integrator` -- integrates the material over each subincrement
/// * `journal` -- receives diagnostic messages
pub fn run_adaptive<I, J>(
    param: &ParamSubstep,
    cel: &Matrix,
    n_tangent: usize,
    stress_old: &Vector,
    state_old: &Vector,
    integrator: &mut I,
    journal: J,
) -> Result<IncrementOutcome, StrError>
where
    I: SubincrementIntegrator + ?Sized,
    J: Journal,
{
    let mut sub = AdaptiveSubstepper::new(param, cel, state_old.dim(), n_tangent, journal)?;
    sub.set_converged_progress(stress_old, state_old)?;
    let mut n_calls = 0;
    while !sub.is_finished() {
        n_calls += 1;
        if too_many_calls(sub.journal(), n_calls, param) {
            return Ok(IncrementOutcome::Cutback(MINIMUM_STEP_CUTBACK));
        }
        let size = sub.next_substep();
        let progress_start = sub.substep_start_progress();
        let (start_stress, start_state) = sub.converged_progress();
        let proceed = match integrator.integrate(start_stress, start_state, size, progress_start)? {
            SubincrementOutcome::Elastic { stress } => {
                sub.finish_elastic_substep(&stress)?;
                true
            }
            SubincrementOutcome::Inelastic {
                stress,
                state,
                local_tangent,
            } => sub.finish_substep(&stress, &local_tangent, &state)?,
            SubincrementOutcome::NotConverged => sub.discard_substep()?,
            SubincrementOutcome::Cutback(new_dt) => return Ok(IncrementOutcome::Cutback(new_dt)),
        };
        if !proceed {
            return Ok(IncrementOutcome::Cutback(MINIMUM_STEP_CUTBACK));
        }
    }
    let res = sub.results()?;
    Ok(IncrementOutcome::Finished(IncrementResults {
        stress: res.stress,
        state: res.state,
        stiffness: res.stiffness,
        n_calls,
        accuracy_degraded: res.accuracy_degraded,
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
