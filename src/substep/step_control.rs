use crate::base::{ParamSubstep, PROGRESS_TOL};

/// Holds the progress of the subdivision of one increment and the current subincrement size
///
/// This is the size-adaptation primitive shared by all substeppers. The progress is the
/// fraction of the total increment already covered (0 ≤ progress ≤ 1).
#[derive(Clone, Debug)]
pub struct StepControl {
    /// Smallest subincrement size
    minimum_step_size: f64,

    /// Growth factor after `n_passes_to_increase` consecutive successes
    scale_up_factor: f64,

    /// Reduction factor after a failure
    scale_down_factor: f64,

    /// Number of consecutive successes required before growing
    n_passes_to_increase: usize,

    /// Fraction of the increment completed so far
    progress: f64,

    /// Size of the current (or last attempted) subincrement
    size: f64,

    /// Number of consecutive successful subincrements
    passed: usize,
}

impl StepControl {
    /// Allocates a new instance
    pub fn new(param: &ParamSubstep) -> Self {
        StepControl {
            minimum_step_size: param.minimum_step_size,
            scale_up_factor: param.scale_up_factor,
            scale_down_factor: param.scale_down_factor,
            n_passes_to_increase: param.n_passes_to_increase,
            progress: 0.0,
            size: param.initial_step_size,
            passed: 0,
        }
    }

    /// Returns the fraction of the increment completed so far
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Returns the size of the current subincrement
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Returns the number of consecutive successful subincrements
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Returns the smallest subincrement size
    pub fn minimum_step_size(&self) -> f64 {
        self.minimum_step_size
    }

    /// Returns the remaining fraction of the increment
    pub fn remaining(&self) -> f64 {
        1.0 - self.progress
    }

    /// Indicates whether the whole increment has been covered (within round-off)
    pub fn is_finished(&self) -> bool {
        self.remaining() <= PROGRESS_TOL
    }

    /// Indicates whether the consecutive successes allow the size to grow
    pub fn may_grow(&self) -> bool {
        self.passed >= self.n_passes_to_increase
    }

    /// Reduces the current size such that the progress never exceeds 1.0
    pub fn clamp_to_remaining(&mut self) {
        let remaining = self.remaining();
        if remaining < self.size {
            self.size = remaining;
        }
    }

    /// Starts the next subincrement optimistically and returns its size
    ///
    /// Grows the size if enough consecutive subincrements succeeded, clamps it to the
    /// remaining progress, and advances the progress as if the subincrement will succeed.
    pub fn advance(&mut self) -> f64 {
        if self.may_grow() {
            self.size *= self.scale_up_factor;
        }
        self.clamp_to_remaining();
        self.passed += 1;
        self.progress += self.size;
        self.size
    }

    /// Accepts the current subincrement (progress += size) and counts the success
    pub fn accept(&mut self) {
        self.progress += self.size;
        self.passed += 1;
    }

    /// Undoes the optimistic advance of the current subincrement and shrinks it
    ///
    /// Returns false if the new size falls below the minimum.
    pub fn rollback(&mut self) -> bool {
        self.progress -= self.size;
        self.passed = 0;
        self.size *= self.scale_down_factor;
        self.size >= self.minimum_step_size
    }

    /// Shrinks the current size by the reduction factor without touching the progress
    ///
    /// Returns false if the new size falls below the minimum.
    pub fn shrink(&mut self) -> bool {
        self.rescale(self.scale_down_factor)
    }

    /// Multiplies the current size by a factor
    ///
    /// Returns false if the new size falls below the minimum.
    pub fn rescale(&mut self, factor: f64) -> bool {
        self.size *= factor;
        self.size >= self.minimum_step_size
    }

    /// Multiplies the current size by a factor without going below the minimum
    pub fn rescale_at_least_minimum(&mut self, factor: f64) {
        self.size = f64::max(self.size * factor, self.minimum_step_size);
    }

    /// Resets the success counter
    pub fn reset_passed(&mut self) {
        self.passed = 0;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
