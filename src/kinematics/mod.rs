//! Implements large-strain kinematics: Hughes-Winget objectivity and strain measures

mod deformation_gradient;
mod hughes_winget;
mod strain;
mod velocity_gradient;
pub use crate::kinematics::deformation_gradient::*;
pub use crate::kinematics::hughes_winget::*;
pub use crate::kinematics::strain::*;
pub use crate::kinematics::velocity_gradient::*;
