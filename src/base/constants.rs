/// Defines the tolerance on the remaining progress to consider the increment finished
///
/// Accumulating subincrement sizes in floating point rarely reaches exactly 1.0.
pub const PROGRESS_TOL: f64 = 2e-16;

/// Defines the magnitude below which entries of the fixed-step consistent tangent are zeroed
pub const TANGENT_ZERO_TOL: f64 = 1e-12;

/// Defines the safety factor of the step-doubling rescale formula
pub const RESCALE_SAFETY: f64 = 0.9;

/// Defines the smallest error ratio used by the rescale formula (below it, the factor is 1.0)
pub const RESCALE_MIN_ERROR_RATIO: f64 = 1e-10;

/// Defines the smallest allowed rescale factor after an error estimate
pub const RESCALE_FACTOR_MIN: f64 = 0.1;

/// Defines the largest allowed rescale factor after an error estimate
pub const RESCALE_FACTOR_MAX: f64 = 10.0;

/// Defines the error ratio below which an out-of-tolerance subincrement is split instead of repeated
pub const SPLIT_MAX_ERROR_RATIO: f64 = 2.0;

/// Defines the global time increment scale requested when the minimum subincrement size is reached
pub const MINIMUM_STEP_CUTBACK: f64 = 0.25;

/// Defines the smallest allowed minimum step size (ParamSubstep)
pub const PARAM_MIN_STEP_SIZE: f64 = 1e-15;

/// Defines the smallest allowed error tolerance (ParamSubstep)
pub const PARAM_MIN_TOL: f64 = 1e-15;

/// Defines the Mandel components (i, j) of a symmetric 3D tensor
///
/// The shear components (index ≥ 3) carry the √2 factor in the Mandel vector.
pub const MANDEL_IJ: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (1, 2), (0, 2)];

/// Returns the Mandel scaling factor for component (i, j): 1 on the diagonal and √2 otherwise
#[inline]
pub fn mandel_factor(i: usize, j: usize) -> f64 {
    if i == j {
        1.0
    } else {
        std::f64::consts::SQRT_2
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
