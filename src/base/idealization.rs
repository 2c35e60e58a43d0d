use russell_tensor::Mandel;
use serde::{Deserialize, Serialize};

/// Defines the stress-state idealization of an integration point
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Idealization {
    /// Full 3D stress state (six Mandel components)
    Solid,

    /// 2D with zero out-of-plane strain (four Mandel components)
    PlaneStrain,

    /// 2D with zero out-of-plane stress (four Mandel components)
    PlaneStress,
}

impl Idealization {
    /// Returns the default idealization for the space dimension
    ///
    /// * `ndim = 2`: plane-strain
    /// * otherwise: solid
    pub fn new(ndim: usize) -> Self {
        if ndim == 2 {
            Idealization::PlaneStrain
        } else {
            Idealization::Solid
        }
    }

    /// Indicates a 2D idealization
    pub fn two_dim(&self) -> bool {
        *self != Idealization::Solid
    }

    /// Indicates the plane-stress idealization
    pub fn plane_stress(&self) -> bool {
        *self == Idealization::PlaneStress
    }

    /// Returns the symmetric Mandel representation of the stress
    pub fn mandel(&self) -> Mandel {
        if self.two_dim() {
            Mandel::Symmetric2D
        } else {
            Mandel::Symmetric
        }
    }

    /// Returns the number of stress components (size of the elastic block of the tangent)
    pub fn n_stress(&self) -> usize {
        self.mandel().dim()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
