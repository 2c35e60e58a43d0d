use super::tangent::with_top_left;
use crate::StrError;
use russell_lab::{mat_mat_mul, Matrix};

/// Specifies how the elastic operator enters the consistent tangent of the fixed-step substeppers
pub trait TangentStrategy {
    /// Returns the number of stress components (size of the elastic block)
    fn n_stress(&self) -> usize;

    /// Returns the operator added to the tangent per unit subincrement size
    fn elastic_tangent(&self) -> &Matrix;

    /// Maps the stress block of the accumulated tangent to the consistent stiffness
    fn stiffness(&self, block: &Matrix) -> Result<Matrix, StrError>;
}

/// Implements a constant elastic operator applied once at the end
///
/// The tangent accumulates identity contributions and the consistent stiffness
/// is the stress block post-multiplied by the elastic stiffness Cel.
#[derive(Clone, Debug)]
pub struct FixedElastic {
    /// Holds the identity contribution
    identity: Matrix,

    /// Holds the (static) elastic stiffness Cel
    cel: Matrix,
}

impl FixedElastic {
    /// Allocates a new instance
    pub fn new(cel: &Matrix, n_tangent: usize) -> Result<Self, StrError> {
        let (nrow, ncol) = cel.dims();
        if nrow != ncol {
            return Err("the elastic stiffness must be square");
        }
        if n_tangent < nrow {
            return Err("the tangent dimension must be ≥ the elastic stiffness dimension");
        }
        Ok(FixedElastic {
            identity: Matrix::identity(n_tangent),
            cel: cel.clone(),
        })
    }
}

impl TangentStrategy for FixedElastic {
    fn n_stress(&self) -> usize {
        self.cel.dims().0
    }

    fn elastic_tangent(&self) -> &Matrix {
        &self.identity
    }

    fn stiffness(&self, block: &Matrix) -> Result<Matrix, StrError> {
        let n = self.n_stress();
        let mut dd = Matrix::new(n, n);
        mat_mat_mul(&mut dd, 1.0, block, &self.cel, 0.0)?;
        Ok(dd)
    }
}

/// Implements an elastic operator that changes from one subincrement to the next
///
/// The current Cel(t) is installed into the top-left block of an identity
/// template before each extension; the consistent stiffness is the stress block itself.
#[derive(Clone, Debug)]
pub struct TimeVariantElastic {
    /// Holds the elastic template (identity with Cel(t) in the top-left corner)
    template: Matrix,

    /// Number of stress components
    n_stress: usize,
}

impl TimeVariantElastic {
    /// Allocates a new instance
    pub fn new(n_stress: usize, n_tangent: usize) -> Result<Self, StrError> {
        if n_stress < 1 {
            return Err("the number of stress components must be ≥ 1");
        }
        if n_tangent < n_stress {
            return Err("the tangent dimension must be ≥ the number of stress components");
        }
        Ok(TimeVariantElastic {
            template: Matrix::identity(n_tangent),
            n_stress,
        })
    }

    /// Installs the current elastic stiffness into the template
    pub fn set_elastic_stiffness(&mut self, cel_t: &Matrix) -> Result<(), StrError> {
        if cel_t.dims() != (self.n_stress, self.n_stress) {
            return Err("the elastic stiffness has an incorrect dimension");
        }
        with_top_left(&mut self.template, cel_t)
    }
}

impl TangentStrategy for TimeVariantElastic {
    fn n_stress(&self) -> usize {
        self.n_stress
    }

    fn elastic_tangent(&self) -> &Matrix {
        &self.template
    }

    fn stiffness(&self, block: &Matrix) -> Result<Matrix, StrError> {
        Ok(block.clone())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
