use super::ParamSubstep;

/// Holds samples of substepping parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns parameters for the fixed-step substeppers starting with four subincrements
    pub fn param_fixed_step() -> ParamSubstep {
        ParamSubstep {
            initial_step_size: 0.25,
            minimum_step_size: 1e-3,
            scale_up_factor: 2.0,
            scale_down_factor: 0.5,
            n_passes_to_increase: 2,
            ..ParamSubstep::new()
        }
    }

    /// Returns parameters for the adaptive substepper
    ///
    /// `initial = 1.0`, `minimum = 1e-6`, `tolerance = 1e-6`
    pub fn param_adaptive() -> ParamSubstep {
        ParamSubstep {
            initial_step_size: 1.0,
            minimum_step_size: 1e-6,
            error_tolerance: 1e-6,
            n_passes_to_increase: 1,
            ..ParamSubstep::new()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
