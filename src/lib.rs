//! Pmsub implements adaptive substepping for the integration of stress-update algorithms
//!
//! The increment of a material update is divided into subincrements. Three substeppers are
//! available: one with fixed elastic stiffness, one with time-variant elastic stiffness, and
//! one that adapts the subincrement size by Richardson (step-doubling) error estimates. All of
//! them accumulate the consistent algorithmic tangent required by Newton-type global solvers.
//!
//! The `kinematics` module provides the Hughes-Winget incremental objectivity helper and the
//! derivatives needed by finite-strain hypoelastic models.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod kinematics;
pub mod material;
pub mod prelude;
pub mod substep;
