//! Implements the base structures: parameters, constants, and diagnostics

mod constants;
mod idealization;
mod journal;
mod param_substep;
mod sample_params;
pub use crate::base::constants::*;
pub use crate::base::idealization::*;
pub use crate::base::journal::*;
pub use crate::base::param_substep::*;
pub use crate::base::sample_params::*;
