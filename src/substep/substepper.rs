use super::{ConsistentTangent, FixedElastic, StepControl, TangentStrategy, TimeVariantElastic};
use crate::base::{Journal, LogJournal, ParamSubstep, TANGENT_ZERO_TOL};
use crate::StrError;
use russell_lab::Matrix;

/// Holds the name used in diagnostic messages
const NAME: &str = "Substepper";

/// Implements the fixed-growth substepper (no error estimate)
///
/// The caller asks for the next subincrement size, integrates the material over it,
/// and reports the outcome:
///
/// ```text
/// while !sub.is_finished() {
///     let size = sub.next_substep();
///     match integrate(size) {
///         elastic   => sub.finish_elastic_substep()?,       // fixed Cel
///         inelastic => sub.finish_substep(&dx_dy)?,         // fixed Cel
///         failed    => if !sub.decrease_substep_size() { abort },
///     }
/// }
/// ```
///
/// The size grows by `scale_up_factor` once `n_passes_to_increase` consecutive
/// subincrements succeeded and shrinks by `scale_down_factor` after a failure.
pub struct Substepper<S: TangentStrategy, J: Journal = LogJournal> {
    /// Holds the progress and the size adaptation
    control: StepControl,

    /// Holds the accumulated consistent tangent
    tangent: ConsistentTangent,

    /// Holds the way the elastic operator enters the tangent
    strategy: S,

    /// Receives diagnostic messages
    journal: J,
}

/// Defines the substepper with a constant elastic stiffness
pub type FixedStepSubstepper<J> = Substepper<FixedElastic, J>;

/// Defines the substepper with an elastic stiffness that varies in time
pub type TimeVariantSubstepper<J> = Substepper<TimeVariantElastic, J>;

impl<S: TangentStrategy, J: Journal> Substepper<S, J> {
    /// Allocates a new instance with a given strategy
    pub fn with_strategy(param: &ParamSubstep, strategy: S, journal: J) -> Result<Self, StrError> {
        if let Some(msg) = param.validate() {
            journal.warn(NAME, &msg);
            return Err("cannot allocate substepper because the parameters are invalid");
        }
        let n_tangent = strategy.elastic_tangent().dims().0;
        Ok(Substepper {
            control: StepControl::new(param),
            tangent: ConsistentTangent::new(n_tangent),
            strategy,
            journal,
        })
    }

    /// Indicates whether the subincrementation has finished
    pub fn is_finished(&self) -> bool {
        self.control.is_finished()
    }

    /// Returns the size of the next subincrement (and advances the progress)
    pub fn next_substep(&mut self) -> f64 {
        self.control.advance()
    }

    /// Undoes the last subincrement and reduces the size
    ///
    /// Returns false if the minimum size has been reached; the caller must then
    /// abandon the increment.
    #[must_use]
    pub fn decrease_substep_size(&mut self) -> bool {
        if self.control.rollback() {
            self.journal.notify(NAME, "decreasing step size");
            true
        } else {
            self.journal.warn(NAME, "minimum step size reached");
            false
        }
    }

    /// Returns the fraction of the increment completed so far (including the current subincrement)
    pub fn progress(&self) -> f64 {
        self.control.progress()
    }

    /// Returns the size of the current subincrement
    pub fn current_substep_size(&self) -> f64 {
        self.control.size()
    }

    /// Returns the accumulated consistent tangent
    pub fn tangent(&self) -> &Matrix {
        self.tangent.matrix()
    }

    /// Returns the overall consistent algorithmic stiffness (n_stress × n_stress)
    pub fn consistent_stiffness(&self) -> Result<Matrix, StrError> {
        let block = self.tangent.top_left(self.strategy.n_stress())?;
        self.strategy.stiffness(&block)
    }

    /// Returns access to the journal
    pub fn journal(&self) -> &J {
        &self.journal
    }
}

impl<J: Journal> Substepper<FixedElastic, J> {
    /// Allocates a new fixed-step substepper
    ///
    /// # Input
    ///
    /// * `param` -- substepping parameters
    /// * `cel` -- (n_stress × n_stress) elastic stiffness applied to the accumulated tangent
    /// * `n_tangent` -- dimension of the material tangent (≥ n_stress)
    /// * `journal` -- receives diagnostic messages
    pub fn new(param: &ParamSubstep, cel: &Matrix, n_tangent: usize, journal: J) -> Result<Self, StrError> {
        let strategy = FixedElastic::new(cel, n_tangent)?;
        Substepper::with_strategy(param, strategy, journal)
    }

    /// Finishes a purely elastic subincrement: T += Δ I
    pub fn finish_elastic_substep(&mut self) -> Result<(), StrError> {
        self.tangent.extend(self.control.size(), self.strategy.elastic_tangent())
    }

    /// Finishes an inelastic subincrement given the local tangent dX/dY: T ← dX/dY · (T + Δ I)
    ///
    /// Entries of the accumulated tangent with magnitude below 1e-12 are set to zero.
    pub fn finish_substep(&mut self, dx_dy: &Matrix) -> Result<(), StrError> {
        self.finish_elastic_substep()?;
        self.tangent.apply_on_the_left(dx_dy)?;
        self.tangent.chop(TANGENT_ZERO_TOL);
        Ok(())
    }
}

impl<J: Journal> Substepper<TimeVariantElastic, J> {
    /// Allocates a new substepper for time-variant elastic stiffness
    ///
    /// # Input
    ///
    /// * `param` -- substepping parameters
    /// * `n_stress` -- number of stress components (size of Cel(t))
    /// * `n_tangent` -- dimension of the material tangent (≥ n_stress)
    /// * `journal` -- receives diagnostic messages
    pub fn new(param: &ParamSubstep, n_stress: usize, n_tangent: usize, journal: J) -> Result<Self, StrError> {
        let strategy = TimeVariantElastic::new(n_stress, n_tangent)?;
        Substepper::with_strategy(param, strategy, journal)
    }

    /// Returns the progress before the current subincrement
    ///
    /// This is where time-dependent quantities of the current subincrement must be evaluated.
    pub fn finished_progress(&self) -> f64 {
        self.control.progress() - self.control.size()
    }

    /// Extends the tangent with the current elastic stiffness: T += Δ E(Cel(t))
    pub fn extend_consistent_tangent(&mut self, cel_t: &Matrix) -> Result<(), StrError> {
        self.strategy.set_elastic_stiffness(cel_t)?;
        self.tangent.extend(self.control.size(), self.strategy.elastic_tangent())
    }

    /// Extends the tangent and chains the material tangent: T ← M · (T + Δ E(Cel(t)))
    pub fn extend_consistent_tangent_with(&mut self, cel_t: &Matrix, mat_tangent: &Matrix) -> Result<(), StrError> {
        self.extend_consistent_tangent(cel_t)?;
        self.tangent.apply_on_the_left(mat_tangent)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
