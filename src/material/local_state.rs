use crate::StrError;
use russell_lab::{vec_copy, Vector};
use russell_tensor::{Mandel, Tensor2};
use serde::{Deserialize, Serialize};

/// Holds local state data of a hypoelastic material
///
/// This data is associated with a Gauss (integration) point
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalState {
    /// Holds the internal values Z
    pub internal_values: Vector,

    /// Holds the stress tensor σ
    pub stress: Tensor2,

    /// Holds the elastic (vs inelastic) flag of the last update
    pub elastic: bool,
}

impl LocalState {
    /// Allocates a new instance
    pub fn new(mandel: Mandel, n_internal_values: usize) -> Self {
        LocalState {
            internal_values: Vector::new(n_internal_values),
            stress: Tensor2::new(mandel),
            elastic: true,
        }
    }

    /// Copies all values from another state
    ///
    /// ```text
    /// self := other
    /// ```
    pub fn mirror(&mut self, other: &LocalState) -> Result<(), StrError> {
        if other.stress.mandel() != self.stress.mandel() {
            return Err("the stress tensors must have the same Mandel representation");
        }
        vec_copy(&mut self.internal_values, &other.internal_values)?;
        self.stress.set_tensor(1.0, &other.stress);
        self.elastic = other.elastic;
        Ok(())
    }

    /// Sets the stress and internal values from flat vectors
    pub fn set_from_vectors(&mut self, stress: &Vector, internal_values: &Vector) -> Result<(), StrError> {
        vec_copy(self.stress.vector_mut(), stress)?;
        vec_copy(&mut self.internal_values, internal_values)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
