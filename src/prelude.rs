//! Makes available common structures needed to integrate a stress update by substepping
//!
//! You may write `use pmsub::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Idealization, Journal, LogJournal, ParamSubstep, RecordingJournal, SampleParams, Severity};
pub use crate::kinematics::HughesWinget;
pub use crate::material::{Convergence, HypoElasticTrait, LinearElastic, LocalState, StrainDriven};
pub use crate::substep::{run_adaptive, run_fixed_step, run_time_variant};
pub use crate::substep::{AdaptiveSubstepper, FixedStepSubstepper, TimeVariantSubstepper};
pub use crate::substep::{IncrementOutcome, IncrementResults, SubincrementIntegrator, SubincrementOutcome};
