//! Implements the substeppers that subdivide one increment of a material update

mod adaptive;
mod driver;
mod error_estimator;
mod step_control;
mod substepper;
mod tangent;
mod tangent_strategy;
pub use crate::substep::adaptive::*;
pub use crate::substep::driver::*;
pub use crate::substep::error_estimator::*;
pub use crate::substep::step_control::*;
pub use crate::substep::substepper::*;
pub use crate::substep::tangent::*;
pub use crate::substep::tangent_strategy::*;
