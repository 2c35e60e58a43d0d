use crate::StrError;
use russell_lab::{mat_add, mat_copy, mat_mat_mul, mat_update, Matrix};

/// Accumulates the consistent tangent of one increment over its subincrements
///
/// The tangent is dense and square; its dimension is fixed at allocation. After each
/// subincrement with local tangent `L` and elastic contribution `E`:
///
/// ```text
/// T ← L · (T + Δ E)
/// ```
///
/// where Δ is the subincrement size. The first `n_stress × n_stress` block holds the
/// stress-related part.
#[derive(Clone, Debug)]
pub struct ConsistentTangent {
    /// Holds the accumulated tangent T
    matrix: Matrix,

    /// Holds an auxiliary matrix for the left multiplication
    work: Matrix,
}

impl ConsistentTangent {
    /// Allocates a new instance filled with zeros
    pub fn new(dim: usize) -> Self {
        ConsistentTangent {
            matrix: Matrix::new(dim, dim),
            work: Matrix::new(dim, dim),
        }
    }

    /// Returns the dimension of the tangent
    pub fn dim(&self) -> usize {
        self.matrix.dims().0
    }

    /// Returns access to the accumulated tangent
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Resets the tangent to zero
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
    }

    /// Adds the elastic contribution of a subincrement: T += Δ E
    pub fn extend(&mut self, size: f64, elastic: &Matrix) -> Result<(), StrError> {
        mat_update(&mut self.matrix, size, elastic)
    }

    /// Chains the local tangent of a subincrement: T ← L · T
    pub fn apply_on_the_left(&mut self, local: &Matrix) -> Result<(), StrError> {
        mat_mat_mul(&mut self.work, 1.0, local, &self.matrix, 0.0)?;
        std::mem::swap(&mut self.matrix, &mut self.work);
        Ok(())
    }

    /// Sets to zero all entries with magnitude below the tolerance
    pub fn chop(&mut self, tolerance: f64) {
        for value in self.matrix.as_mut_data().iter_mut() {
            if f64::abs(*value) < tolerance {
                *value = 0.0;
            }
        }
    }

    /// Copies another tangent into this one
    pub fn set(&mut self, other: &ConsistentTangent) -> Result<(), StrError> {
        mat_copy(&mut self.matrix, &other.matrix)
    }

    /// Computes the Richardson extrapolation T = 2 fine - coarse
    pub fn extrapolate(&mut self, fine: &ConsistentTangent, coarse: &ConsistentTangent) -> Result<(), StrError> {
        mat_add(&mut self.matrix, 2.0, &fine.matrix, -1.0, &coarse.matrix)
    }

    /// Returns a copy of the top-left n × n block
    pub fn top_left(&self, n: usize) -> Result<Matrix, StrError> {
        if n > self.dim() {
            return Err("the block size must be ≤ the tangent dimension");
        }
        let mut block = Matrix::new(n, n);
        for i in 0..n {
            for j in 0..n {
                block.set(i, j, self.matrix.get(i, j));
            }
        }
        Ok(block)
    }
}

/// Replaces the top-left block of `template` by `block`
pub(crate) fn with_top_left(template: &mut Matrix, block: &Matrix) -> Result<(), StrError> {
    let (n, m) = block.dims();
    let (nt, mt) = template.dims();
    if n != m || n > nt || m > mt {
        return Err("the block must be square and fit into the top-left corner");
    }
    for i in 0..n {
        for j in 0..n {
            template.set(i, j, block.get(i, j));
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{with_top_left, ConsistentTangent};
    use russell_lab::{mat_approx_eq, Matrix};

    #[test]
    fn new_and_extend_work() {
        let mut tangent = ConsistentTangent::new(3);
        assert_eq!(tangent.dim(), 3);
        mat_approx_eq(tangent.matrix(), &Matrix::new(3, 3), 1e-15);
        tangent.extend(0.5, &Matrix::identity(3)).unwrap();
        tangent.extend(0.25, &Matrix::identity(3)).unwrap();
        let correct = Matrix::from(&[[0.75, 0.0, 0.0], [0.0, 0.75, 0.0], [0.0, 0.0, 0.75]]);
        mat_approx_eq(tangent.matrix(), &correct, 1e-15);
        tangent.clear();
        mat_approx_eq(tangent.matrix(), &Matrix::new(3, 3), 1e-15);
    }

    #[test]
    fn apply_on_the_left_works() {
        let mut tangent = ConsistentTangent::new(2);
        tangent.extend(1.0, &Matrix::from(&[[1.0, 2.0], [3.0, 4.0]])).unwrap();
        let local = Matrix::from(&[[0.0, 1.0], [1.0, 0.0]]);
        tangent.apply_on_the_left(&local).unwrap();
        let correct = Matrix::from(&[[3.0, 4.0], [1.0, 2.0]]);
        mat_approx_eq(tangent.matrix(), &correct, 1e-15);
        assert!(tangent.apply_on_the_left(&Matrix::new(3, 3)).is_err());
    }

    #[test]
    fn chop_works() {
        let mut tangent = ConsistentTangent::new(2);
        tangent.extend(1.0, &Matrix::from(&[[1.0, 1e-13], [-1e-13, 2e-12]])).unwrap();
        tangent.chop(1e-12);
        let correct = Matrix::from(&[[1.0, 0.0], [0.0, 2e-12]]);
        mat_approx_eq(tangent.matrix(), &correct, 1e-15);
    }

    #[test]
    fn set_and_extrapolate_work() {
        let mut fine = ConsistentTangent::new(2);
        let mut coarse = ConsistentTangent::new(2);
        fine.extend(1.0, &Matrix::from(&[[2.0, 1.0], [1.0, 2.0]])).unwrap();
        coarse.extend(1.0, &Matrix::from(&[[1.0, 1.0], [0.0, 1.0]])).unwrap();
        let mut result = ConsistentTangent::new(2);
        result.extrapolate(&fine, &coarse).unwrap();
        let correct = Matrix::from(&[[3.0, 1.0], [2.0, 3.0]]);
        mat_approx_eq(result.matrix(), &correct, 1e-15);
        result.set(&coarse).unwrap();
        mat_approx_eq(result.matrix(), coarse.matrix(), 1e-15);
    }

    #[test]
    fn top_left_works() {
        let mut tangent = ConsistentTangent::new(3);
        tangent
            .extend(1.0, &Matrix::from(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]))
            .unwrap();
        let block = tangent.top_left(2).unwrap();
        mat_approx_eq(&block, &Matrix::from(&[[1.0, 2.0], [4.0, 5.0]]), 1e-15);
        assert_eq!(
            tangent.top_left(4).err(),
            Some("the block size must be ≤ the tangent dimension")
        );
    }

    #[test]
    fn with_top_left_works() {
        let mut template = Matrix::identity(3);
        with_top_left(&mut template, &Matrix::from(&[[5.0, 6.0], [7.0, 8.0]])).unwrap();
        let correct = Matrix::from(&[[5.0, 6.0, 0.0], [7.0, 8.0, 0.0], [0.0, 0.0, 1.0]]);
        mat_approx_eq(&template, &correct, 1e-15);
        assert_eq!(
            with_top_left(&mut template, &Matrix::new(4, 4)).err(),
            Some("the block must be square and fit into the top-left corner")
        );
    }
}
