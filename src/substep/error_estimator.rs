use crate::StrError;
use russell_lab::{vec_add, vec_norm, Norm, Vector};

/// Estimates the local error of a Richardson cycle
///
/// The fine estimate is the result of the two half steps; the coarse one is the result
/// of the single full step. Both start from the same converged progress.
pub trait ErrorEstimator {
    /// Returns the (non-negative) error measure
    fn estimate(
        &self,
        fine_stress: &Vector,
        fine_state: &Vector,
        coarse_stress: &Vector,
        coarse_state: &Vector,
    ) -> Result<f64, StrError>;
}

/// Measures the error as the Euclidean norm of the stress difference
#[derive(Clone, Copy, Debug, Default)]
pub struct StressNormError;

/// Measures the error as the Euclidean norm over the stress and state differences
///
/// Useful when the integration-dependent state variables drive the response
/// (e.g., a hardening variable that lags behind the stress).
#[derive(Clone, Copy, Debug, Default)]
pub struct StressStateNormError;

/// Computes ‖a - b‖₂
fn norm_of_difference(a: &Vector, b: &Vector) -> Result<f64, StrError> {
    let mut diff = Vector::new(a.dim());
    vec_add(&mut diff, 1.0, a, -1.0, b)?;
    Ok(vec_norm(&diff, Norm::Euc))
}

impl ErrorEstimator for StressNormError {
    fn estimate(&self, fine_stress: &Vector, _: &Vector, coarse_stress: &Vector, _: &Vector) -> Result<f64, StrError> {
        norm_of_difference(fine_stress, coarse_stress)
    }
}

impl ErrorEstimator for StressStateNormError {
    fn estimate(
        &self,
        fine_stress: &Vector,
        fine_state: &Vector,
        coarse_stress: &Vector,
        coarse_state: &Vector,
    ) -> Result<f64, StrError> {
        let err_stress = norm_of_difference(fine_stress, coarse_stress)?;
        let err_state = norm_of_difference(fine_state, coarse_state)?;
        Ok(f64::sqrt(err_stress * err_stress + err_state * err_state))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ErrorEstimator, StressNormError, StressStateNormError};
    use russell_lab::{approx_eq, Vector};

    #[test]
    fn stress_norm_error_works() {
        let fine = Vector::from(&[1.0, 2.0, 3.0]);
        let coarse = Vector::from(&[1.0, 5.0, 7.0]);
        let q_fine = Vector::from(&[100.0]);
        let q_coarse = Vector::from(&[0.0]);
        let err = StressNormError.estimate(&fine, &q_fine, &coarse, &q_coarse).unwrap();
        approx_eq(err, 5.0, 1e-15);
        assert!(StressNormError
            .estimate(&fine, &q_fine, &Vector::new(2), &q_coarse)
            .is_err());
    }

    #[test]
    fn stress_state_norm_error_works() {
        let fine = Vector::from(&[3.0, 0.0]);
        let coarse = Vector::from(&[0.0, 0.0]);
        let q_fine = Vector::from(&[2.0, 2.0]);
        let q_coarse = Vector::from(&[0.0, 1.0]);
        let err = StressStateNormError.estimate(&fine, &q_fine, &coarse, &q_coarse).unwrap();
        approx_eq(err, f64::sqrt(14.0), 1e-15);

        // no state variables
        let empty = Vector::new(0);
        let err = StressStateNormError.estimate(&fine, &empty, &coarse, &empty).unwrap();
        approx_eq(err, 3.0, 1e-15);
    }
}
