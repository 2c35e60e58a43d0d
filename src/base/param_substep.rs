use super::{PARAM_MIN_STEP_SIZE, PARAM_MIN_TOL};
use serde::{Deserialize, Serialize};

/// Holds the parameters controlling the subdivision of one (global) increment
///
/// The step sizes are fractions of the total increment, thus `0 < minimum ≤ initial ≤ 1`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamSubstep {
    /// Size of the first subincrement
    pub initial_step_size: f64,

    /// Smallest subincrement size before the substepper reports failure
    pub minimum_step_size: f64,

    /// Growth factor applied by the fixed-step substeppers after consecutive successes
    pub scale_up_factor: f64,

    /// Reduction factor applied after a failed subincrement (0 < f < 1)
    pub scale_down_factor: f64,

    /// Number of consecutive successful subincrements required before growing the size
    pub n_passes_to_increase: usize,

    /// Tolerance on the step-doubling error estimate (adaptive substepper only)
    pub error_tolerance: f64,

    /// Accepts an out-of-tolerance result instead of failing when the minimum size is reached (adaptive only)
    pub ignore_error_tolerance_on_minimum_step_size: bool,

    /// Maximum number of subincrement attempts in the driver loops
    pub n_max_substeps: usize,
}

impl ParamSubstep {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        ParamSubstep {
            initial_step_size: 1.0,
            minimum_step_size: 1e-6,
            scale_up_factor: 1.2,
            scale_down_factor: 0.5,
            n_passes_to_increase: 3,
            error_tolerance: 1e-6,
            ignore_error_tolerance_on_minimum_step_size: true,
            n_max_substeps: 10_000,
        }
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.initial_step_size <= 0.0 || self.initial_step_size > 1.0 {
            return Some(format!(
                "initial_step_size = {:?} is incorrect; it must be 0.0 < size ≤ 1.0",
                self.initial_step_size
            ));
        }
        if self.minimum_step_size < PARAM_MIN_STEP_SIZE {
            return Some(format!(
                "minimum_step_size = {:?} is incorrect; it must be ≥ {:e}",
                self.minimum_step_size, PARAM_MIN_STEP_SIZE
            ));
        }
        if self.minimum_step_size > self.initial_step_size {
            return Some(format!(
                "minimum_step_size = {:?} is incorrect; it must be ≤ initial_step_size = {:?}",
                self.minimum_step_size, self.initial_step_size
            ));
        }
        if self.scale_up_factor < 1.0 {
            return Some(format!(
                "scale_up_factor = {:?} is incorrect; it must be ≥ 1.0",
                self.scale_up_factor
            ));
        }
        if self.scale_down_factor <= 0.0 || self.scale_down_factor >= 1.0 {
            return Some(format!(
                "scale_down_factor = {:?} is incorrect; it must be 0.0 < factor < 1.0",
                self.scale_down_factor
            ));
        }
        if self.error_tolerance < PARAM_MIN_TOL {
            return Some(format!(
                "error_tolerance = {:?} is incorrect; it must be ≥ {:e}",
                self.error_tolerance, PARAM_MIN_TOL
            ));
        }
        if self.n_max_substeps < 1 {
            return Some(format!(
                "n_max_substeps = {:?} is incorrect; it must be ≥ 1",
                self.n_max_substeps
            ));
        }
        None // all good
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
