use super::tangent::with_top_left;
use super::{ConsistentTangent, ErrorEstimator, StepControl, StressNormError};
use crate::base::{Journal, LogJournal, ParamSubstep, SPLIT_MAX_ERROR_RATIO};
use crate::base::{RESCALE_FACTOR_MAX, RESCALE_FACTOR_MIN, RESCALE_MIN_ERROR_RATIO, RESCALE_SAFETY};
use crate::StrError;
use russell_lab::{vec_add, vec_copy, Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Holds the name used in diagnostic messages
const NAME: &str = "AdaptiveSubstepper";

/// Defines the phase of the Richardson cycle (full / half / half)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Phase {
    /// Waiting for the result of the full subincrement
    FullStep,

    /// Waiting for the result of the first half subincrement
    FirstHalfStep,

    /// Waiting for the result of the second half subincrement
    SecondHalfStep,
}

/// Holds the results after the increment has been completed
#[derive(Clone, Debug)]
pub struct AdaptiveResults {
    /// Final stress
    pub stress: Vector,

    /// Final integration-dependent state variables
    pub state: Vector,

    /// Consistent algorithmic stiffness (n_stress × n_stress)
    pub stiffness: Matrix,

    /// Indicates that at least one subincrement was accepted with the error above the tolerance
    pub accuracy_degraded: bool,
}

/// Holds stress, state, and accumulated tangent at some point of the increment
#[derive(Clone, Debug)]
struct Snapshot {
    stress: Vector,
    state: Vector,
    tangent: ConsistentTangent,
}

impl Snapshot {
    fn new(n_stress: usize, n_state: usize, n_tangent: usize) -> Self {
        Snapshot {
            stress: Vector::new(n_stress),
            state: Vector::new(n_state),
            tangent: ConsistentTangent::new(n_tangent),
        }
    }

    /// Copies the other snapshot into this one
    fn set(&mut self, other: &Snapshot) -> Result<(), StrError> {
        vec_copy(&mut self.stress, &other.stress)?;
        vec_copy(&mut self.state, &other.state)?;
        self.tangent.set(&other.tangent)
    }

    /// Sets the trial result of a subincrement starting at `start`: T = L · (T_start + Δ E)
    fn set_trial(
        &mut self,
        start: &ConsistentTangent,
        size: f64,
        elastic: &Matrix,
        stress: &Vector,
        local_tangent: &Matrix,
        state: &Vector,
    ) -> Result<(), StrError> {
        vec_copy(&mut self.stress, stress)?;
        vec_copy(&mut self.state, state)?;
        self.tangent.set(start)?;
        self.tangent.extend(size, elastic)?;
        self.tangent.apply_on_the_left(local_tangent)
    }

    /// Computes the Richardson extrapolation X = 2 fine - coarse
    fn extrapolate(&mut self, fine: &Snapshot, coarse: &Snapshot) -> Result<(), StrError> {
        vec_add(&mut self.stress, 2.0, &fine.stress, -1.0, &coarse.stress)?;
        vec_add(&mut self.state, 2.0, &fine.state, -1.0, &coarse.state)?;
        self.tangent.extrapolate(&fine.tangent, &coarse.tangent)
    }
}

/// Implements the adaptive substepper with error control by step doubling
///
/// Each subincrement is computed once with the full size and once as two half steps;
/// the difference of both estimates measures the local error. Accepted subincrements
/// are combined by Richardson extrapolation (2 × fine - coarse) for stress, state, and
/// tangent. The caller drives the cycle:
///
/// ```text
/// sub.set_converged_progress(&stress_old, &state_old)?;
/// while !sub.is_finished() {
///     let size = sub.next_substep();
///     let (stress, state) = sub.converged_progress();
///     match integrate(stress, state, size) {
///         elastic   => sub.finish_elastic_substep(&new_stress)?,
///         inelastic => if !sub.finish_substep(&new_stress, &dx_dy, &new_state)? { abort },
///         failed    => if !sub.discard_substep() { abort },
///     }
/// }
/// let results = sub.results()?;
/// ```
pub struct AdaptiveSubstepper<E: ErrorEstimator = StressNormError, J: Journal = LogJournal> {
    /// Holds the progress and the size adaptation
    control: StepControl,

    /// Allowed local error
    error_tolerance: f64,

    /// Accept the full step if the subincrement cannot be refined further
    ignore_error_tolerance_on_minimum_step_size: bool,

    /// Identity with the elastic stiffness in the top-left corner
    elastic_tangent: Matrix,

    /// Number of stress components
    n_stress: usize,

    /// Current phase of the Richardson cycle
    phase: Phase,

    /// Number of full subincrements started so far
    substep_index: usize,

    /// Error of the last completed cycle
    last_error: f64,

    /// Indicates that a subincrement was accepted with the error above the tolerance
    accuracy_degraded: bool,

    /// Holds the accepted progress
    progress: Snapshot,

    /// Holds the full-step trial
    full: Snapshot,

    /// Holds the first half-step trial
    half: Snapshot,

    /// Measures the local error
    estimator: E,

    /// Receives diagnostic messages
    journal: J,
}

impl<J: Journal> AdaptiveSubstepper<StressNormError, J> {
    /// Allocates a new instance measuring the error by the stress norm
    ///
    /// # Input
    ///
    /// * `param` -- substepping parameters
    /// * `cel` -- (n_stress × n_stress) elastic stiffness
    /// * `n_state` -- number of integration-dependent state variables
    /// * `n_tangent` -- dimension of the material tangent (≥ n_stress)
    /// * `journal` -- receives diagnostic messages
    pub fn new(param: &ParamSubstep, cel: &Matrix, n_state: usize, n_tangent: usize, journal: J) -> Result<Self, StrError> {
        AdaptiveSubstepper::with_estimator(param, cel, n_state, n_tangent, StressNormError, journal)
    }
}

impl<E: ErrorEstimator, J: Journal> AdaptiveSubstepper<E, J> {
    /// Allocates a new instance with a given error estimator
    pub fn with_estimator(
        param: &ParamSubstep,
        cel: &Matrix,
        n_state: usize,
        n_tangent: usize,
        estimator: E,
        journal: J,
    ) -> Result<Self, StrError> {
        if let Some(msg) = param.validate() {
            journal.warn(NAME, &msg);
            return Err("cannot allocate substepper because the parameters are invalid");
        }
        let (n_stress, ncol) = cel.dims();
        if n_stress != ncol {
            return Err("the elastic stiffness must be square");
        }
        if n_tangent < n_stress {
            return Err("the tangent dimension must be ≥ the elastic stiffness dimension");
        }
        let mut elastic_tangent = Matrix::identity(n_tangent);
        with_top_left(&mut elastic_tangent, cel)?;
        Ok(AdaptiveSubstepper {
            control: StepControl::new(param),
            error_tolerance: param.error_tolerance,
            ignore_error_tolerance_on_minimum_step_size: param.ignore_error_tolerance_on_minimum_step_size,
            elastic_tangent,
            n_stress,
            phase: Phase::FullStep,
            substep_index: 0,
            last_error: 0.0,
            accuracy_degraded: false,
            progress: Snapshot::new(n_stress, n_state, n_tangent),
            full: Snapshot::new(n_stress, n_state, n_tangent),
            half: Snapshot::new(n_stress, n_state, n_tangent),
            estimator,
            journal,
        })
    }

    /// Sets the stress and state at the beginning of the increment
    pub fn set_converged_progress(&mut self, stress: &Vector, state: &Vector) -> Result<(), StrError> {
        vec_copy(&mut self.progress.stress, stress)?;
        vec_copy(&mut self.progress.state, state)
    }

    /// Indicates whether the increment has been completed
    pub fn is_finished(&self) -> bool {
        self.control.is_finished() && self.phase == Phase::FullStep
    }

    /// Returns the size of the next subincrement
    ///
    /// In the full-step phase, the size is clamped to the remaining progress.
    /// In the half-step phases, half of the current size is returned.
    pub fn next_substep(&mut self) -> f64 {
        match self.phase {
            Phase::FullStep => {
                self.control.clamp_to_remaining();
                self.substep_index += 1;
                self.control.size()
            }
            Phase::FirstHalfStep | Phase::SecondHalfStep => 0.5 * self.control.size(),
        }
    }

    /// Returns the (stress, state) from which the next subincrement must start
    pub fn converged_progress(&self) -> (&Vector, &Vector) {
        match self.phase {
            Phase::FullStep | Phase::FirstHalfStep => (&self.progress.stress, &self.progress.state),
            Phase::SecondHalfStep => (&self.half.stress, &self.half.state),
        }
    }

    /// Returns the fraction of the increment at which the next subincrement starts
    pub fn substep_start_progress(&self) -> f64 {
        match self.phase {
            Phase::FullStep | Phase::FirstHalfStep => self.control.progress(),
            Phase::SecondHalfStep => self.control.progress() + 0.5 * self.control.size(),
        }
    }

    /// Reports an inelastic subincrement
    ///
    /// # Input
    ///
    /// * `stress` -- resulting stress
    /// * `local_tangent` -- local tangent dX/dY of the subincrement (n_tangent × n_tangent)
    /// * `state` -- resulting integration-dependent state variables
    ///
    /// # Output
    ///
    /// Returns false if the increment cannot be continued (minimum size reached).
    pub fn finish_substep(&mut self, stress: &Vector, local_tangent: &Matrix, state: &Vector) -> Result<bool, StrError> {
        let size = self.control.size();
        match self.phase {
            Phase::FullStep => {
                self.full.set_trial(
                    &self.progress.tangent,
                    size,
                    &self.elastic_tangent,
                    stress,
                    local_tangent,
                    state,
                )?;
                self.phase = Phase::FirstHalfStep;
                Ok(true)
            }
            Phase::FirstHalfStep => {
                self.half.set_trial(
                    &self.progress.tangent,
                    0.5 * size,
                    &self.elastic_tangent,
                    stress,
                    local_tangent,
                    state,
                )?;
                self.phase = Phase::SecondHalfStep;
                Ok(true)
            }
            Phase::SecondHalfStep => {
                self.phase = Phase::FullStep;
                let error = self.estimator.estimate(stress, state, &self.full.stress, &self.full.state)?;
                let ratio = error / self.error_tolerance;
                let factor = self.rescale_factor(ratio);
                self.last_error = error;

                if error > self.error_tolerance {
                    self.control.reset_passed();
                    if size < 2.0 * self.control.minimum_step_size() {
                        return self.accept_at_minimum_step_size();
                    }
                    if ratio < SPLIT_MAX_ERROR_RATIO {
                        self.journal.notify(
                            NAME,
                            &format!("error ratio {:.3} in subincrement {}; splitting", ratio, self.substep_index),
                        );
                        return self.split_current_substep();
                    }
                    self.journal.notify(
                        NAME,
                        &format!("error ratio {:.3} in subincrement {}; repeating", ratio, self.substep_index),
                    );
                    self.repeat_with_proposed_size(factor);
                    return Ok(true);
                }

                // second half continues from the first half
                vec_copy(&mut self.half.stress, stress)?;
                vec_copy(&mut self.half.state, state)?;
                self.half.tangent.extend(0.5 * size, &self.elastic_tangent)?;
                self.half.tangent.apply_on_the_left(local_tangent)?;

                self.progress.extrapolate(&self.half, &self.full)?;
                self.control.accept();
                if factor < 1.0 || self.control.may_grow() {
                    self.control.rescale_at_least_minimum(factor);
                }
                Ok(true)
            }
        }
    }

    /// Reports a purely elastic subincrement
    pub fn finish_elastic_substep(&mut self, stress: &Vector) -> Result<(), StrError> {
        let size = self.control.size();
        match self.phase {
            Phase::FullStep => {
                // the half steps would be elastic too
                self.progress.tangent.extend(size, &self.elastic_tangent)?;
                vec_copy(&mut self.progress.stress, stress)?;
                self.control.accept();
            }
            Phase::FirstHalfStep => {
                self.half.tangent.set(&self.progress.tangent)?;
                self.half.tangent.extend(0.5 * size, &self.elastic_tangent)?;
                vec_copy(&mut self.half.stress, stress)?;
                vec_copy(&mut self.half.state, &self.progress.state)?;
                self.phase = Phase::SecondHalfStep;
            }
            Phase::SecondHalfStep => {
                self.accept_full_step_only()?;
            }
        }
        Ok(())
    }

    /// Reports a failed subincrement (e.g., the local return mapping did not converge)
    ///
    /// In the full-step phase the size is reduced by `scale_down_factor`. In a half-step
    /// phase the full step has already converged; thus it is accepted without error control.
    ///
    /// Returns false if the increment cannot be continued (minimum size reached).
    pub fn discard_substep(&mut self) -> Result<bool, StrError> {
        self.control.reset_passed();
        match self.phase {
            Phase::FullStep => {
                if self.control.shrink() {
                    Ok(true)
                } else {
                    self.journal.warn(NAME, "minimum step size reached");
                    Ok(false)
                }
            }
            Phase::FirstHalfStep | Phase::SecondHalfStep => {
                let which = if self.phase == Phase::FirstHalfStep { "first" } else { "second" };
                self.journal.warn(
                    NAME,
                    &format!("{} half step has not converged after a converged full step", which),
                );
                self.accuracy_degraded = true;
                self.accept_full_step_only()?;
                Ok(true)
            }
        }
    }

    /// Restarts the current subincrement as a full step with the size multiplied by `factor`
    ///
    /// Returns false if the new size falls below the minimum.
    pub fn repeat_substep(&mut self, factor: f64) -> bool {
        self.phase = Phase::FullStep;
        self.control.reset_passed();
        if self.control.rescale(factor) {
            true
        } else {
            self.journal.warn(NAME, "minimum step size reached");
            false
        }
    }

    /// Returns the current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the accepted fraction of the increment
    pub fn progress(&self) -> f64 {
        self.control.progress()
    }

    /// Returns the size of the current full subincrement
    pub fn current_substep_size(&self) -> f64 {
        self.control.size()
    }

    /// Returns the number of full subincrements started so far
    pub fn substep_index(&self) -> usize {
        self.substep_index
    }

    /// Returns the error of the last completed Richardson cycle
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    /// Indicates that a subincrement was accepted with the error above the tolerance
    pub fn accuracy_degraded(&self) -> bool {
        self.accuracy_degraded
    }

    /// Returns the stress block of the tangent accumulated up to the accepted progress
    pub fn current_tangent_operator(&self) -> Result<Matrix, StrError> {
        self.progress.tangent.top_left(self.n_stress)
    }

    /// Returns the final stress, state, and consistent stiffness
    pub fn results(&self) -> Result<AdaptiveResults, StrError> {
        if !self.is_finished() {
            return Err("results are only available after the increment has been completed");
        }
        Ok(AdaptiveResults {
            stress: self.progress.stress.clone(),
            state: self.progress.state.clone(),
            stiffness: self.progress.tangent.top_left(self.n_stress)?,
            accuracy_degraded: self.accuracy_degraded,
        })
    }

    /// Returns access to the journal
    pub fn journal(&self) -> &J {
        &self.journal
    }

    /// Computes the factor proposed for the next subincrement size
    ///
    /// The factor is 0.9 √(1/ratio) limited to [0.1, 10] and such that the
    /// rescaled size is not below the minimum.
    fn rescale_factor(&self, ratio: f64) -> f64 {
        let mut factor = if ratio > RESCALE_MIN_ERROR_RATIO {
            RESCALE_SAFETY * f64::sqrt(1.0 / ratio)
        } else {
            1.0
        };
        if factor < RESCALE_FACTOR_MIN {
            factor = RESCALE_FACTOR_MIN;
        }
        let size = self.control.size();
        if factor * size < self.control.minimum_step_size() {
            factor = self.control.minimum_step_size() / size;
        }
        if factor > RESCALE_FACTOR_MAX {
            factor = RESCALE_FACTOR_MAX;
        }
        factor
    }

    /// Accepts the full-step trial without extrapolation
    fn accept_full_step_only(&mut self) -> Result<(), StrError> {
        self.progress.set(&self.full)?;
        self.control.accept();
        self.phase = Phase::FullStep;
        Ok(())
    }

    /// Handles an out-of-tolerance cycle when the size cannot be refined anymore
    fn accept_at_minimum_step_size(&mut self) -> Result<bool, StrError> {
        if !self.ignore_error_tolerance_on_minimum_step_size {
            self.journal.warn(NAME, "minimum step size reached");
            return Ok(false);
        }
        self.journal.warn(
            NAME,
            &format!(
                "minimum step size reached; accepting subincrement {} with error {:e}",
                self.substep_index, self.last_error
            ),
        );
        self.accuracy_degraded = true;
        self.accept_full_step_only()?;
        Ok(true)
    }

    /// Restarts the current subincrement with a factor from `rescale_factor`
    ///
    /// The factor was already limited by the minimum size; thus the new size is floored at
    /// the minimum exactly (the product may land one ulp below it).
    fn repeat_with_proposed_size(&mut self, factor: f64) {
        self.phase = Phase::FullStep;
        self.control.reset_passed();
        self.control.rescale_at_least_minimum(factor);
    }

    /// Turns the first half step into the new full-step baseline of a halved subincrement
    fn split_current_substep(&mut self) -> Result<bool, StrError> {
        self.full.set(&self.half)?;
        // the caller has checked that size ≥ 2·minimum
        let above_minimum = self.control.rescale(0.5);
        debug_assert!(above_minimum);
        self.phase = Phase::FirstHalfStep;
        Ok(true)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
