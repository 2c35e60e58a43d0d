use crate::StrError;
use russell_lab::Matrix;

/// Embeds a 1×1, 2×2, or 3×3 deformation gradient into a 3×3 one
///
/// The missing components are taken from the identity tensor.
pub fn make_3d(ff: &Matrix) -> Result<Matrix, StrError> {
    let (nrow, ncol) = ff.dims();
    if nrow != ncol || nrow < 1 || nrow > 3 {
        return Err("the deformation gradient must be 1×1, 2×2, or 3×3");
    }
    let mut ff3 = Matrix::identity(3);
    for i in 0..nrow {
        for j in 0..ncol {
            ff3.set(i, j, ff.get(i, j));
        }
    }
    Ok(ff3)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::make_3d;
    use russell_lab::{mat_approx_eq, Matrix};

    #[test]
    fn make_3d_captures_errors() {
        assert_eq!(
            make_3d(&Matrix::new(2, 3)).err(),
            Some("the deformation gradient must be 1×1, 2×2, or 3×3")
        );
        assert_eq!(
            make_3d(&Matrix::new(4, 4)).err(),
            Some("the deformation gradient must be 1×1, 2×2, or 3×3")
        );
    }

    #[test]
    fn make_3d_works() {
        let ff = make_3d(&Matrix::from(&[[1.1]])).unwrap();
        mat_approx_eq(&ff, &[[1.1, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], 1e-15);

        let ff = make_3d(&Matrix::from(&[[1.1, 0.2], [0.3, 0.9]])).unwrap();
        mat_approx_eq(&ff, &[[1.1, 0.2, 0.0], [0.3, 0.9, 0.0], [0.0, 0.0, 1.0]], 1e-15);

        let full = Matrix::from(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        mat_approx_eq(&make_3d(&full).unwrap(), &full, 1e-15);
    }
}
