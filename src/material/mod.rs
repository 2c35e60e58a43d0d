//! Implements hypoelastic material models and their connection to the substeppers

mod hypo_elastic;
mod linear_elastic;
mod local_state;
mod strain_driven;
pub use crate::material::hypo_elastic::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::local_state::*;
pub use crate::material::strain_driven::*;
