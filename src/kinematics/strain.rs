use super::kron;
use crate::base::{mandel_factor, MANDEL_IJ};
use crate::StrError;
use russell_lab::Matrix;
use russell_tensor::{Mandel, Tensor2};

/// Checks that the deformation gradient is 3×3
fn check_3x3(ff: &Matrix) -> Result<(), StrError> {
    if ff.dims() != (3, 3) {
        return Err("the deformation gradient must be 3×3");
    }
    Ok(())
}

/// Computes the Green-Lagrange strain tensor E = ½ (H + Hᵀ + Hᵀ H) with H = F - I
pub fn green_lagrange(ff: &Matrix) -> Result<Tensor2, StrError> {
    check_3x3(ff)?;
    let mut ee = Tensor2::new(Mandel::Symmetric);
    for (i, j) in MANDEL_IJ {
        let hij = ff.get(i, j) - kron(i, j);
        let hji = ff.get(j, i) - kron(j, i);
        let mut hth = 0.0;
        for k in 0..3 {
            hth += (ff.get(k, i) - kron(k, i)) * (ff.get(k, j) - kron(k, j));
        }
        ee.sym_set(i, j, 0.5 * (hij + hji + hth));
    }
    Ok(ee)
}

/// Computes the derivative of the Green-Lagrange strain (Mandel) w.r.t. the deformation gradient
///
/// Returns a 6 × 9 matrix with the column of Fₖₗ at `k·3 + l`:
///
/// ```text
///  ∂Eₘ
/// ───── = ½ (δᵢₗ Fₖⱼ + δⱼₗ Fₖᵢ) · s(i,j)    with (i,j) = pair of m
///  ∂Fₖₗ
/// ```
pub fn dgreen_lagrange_df(ff: &Matrix) -> Result<Matrix, StrError> {
    check_3x3(ff)?;
    let mut de_df = Matrix::new(6, 9);
    for (m, (i, j)) in MANDEL_IJ.iter().enumerate() {
        let (i, j) = (*i, *j);
        for k in 0..3 {
            for l in 0..3 {
                let value = 0.5 * (kron(i, l) * ff.get(k, j) + kron(j, l) * ff.get(k, i)) * mandel_factor(i, j);
                de_df.set(m, k * 3 + l, value);
            }
        }
    }
    Ok(de_df)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{dgreen_lagrange_df, green_lagrange};
    use russell_lab::{approx_eq, vec_approx_eq, Matrix};
    use russell_tensor::SQRT_2;

    #[test]
    fn green_lagrange_captures_errors() {
        assert_eq!(
            green_lagrange(&Matrix::new(2, 2)).err(),
            Some("the deformation gradient must be 3×3")
        );
        assert_eq!(
            dgreen_lagrange_df(&Matrix::new(2, 2)).err(),
            Some("the deformation gradient must be 3×3")
        );
    }

    #[test]
    fn green_lagrange_works() {
        let ff = Matrix::from(&[[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let ee = green_lagrange(&ff).unwrap();
        vec_approx_eq(ee.vector(), &[1.5, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-15);

        // simple shear
        let gamma = 0.4;
        let ff = Matrix::from(&[[1.0, gamma, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let ee = green_lagrange(&ff).unwrap();
        let correct = &[0.0, gamma * gamma / 2.0, 0.0, gamma / 2.0 * SQRT_2, 0.0, 0.0];
        vec_approx_eq(ee.vector(), correct, 1e-15);
    }

    #[test]
    fn dgreen_lagrange_df_matches_finite_differences() {
        let ff = Matrix::from(&[[1.1, 0.2, -0.1], [0.05, 0.95, 0.3], [0.0, -0.2, 1.2]]);
        let de_df = dgreen_lagrange_df(&ff).unwrap();
        let h = 1e-6;
        for k in 0..3 {
            for l in 0..3 {
                let mut ff_plus = ff.clone();
                let mut ff_minus = ff.clone();
                ff_plus.set(k, l, ff.get(k, l) + h);
                ff_minus.set(k, l, ff.get(k, l) - h);
                let e_plus = green_lagrange(&ff_plus).unwrap();
                let e_minus = green_lagrange(&ff_minus).unwrap();
                for m in 0..6 {
                    let num = (e_plus.vector()[m] - e_minus.vector()[m]) / (2.0 * h);
                    approx_eq(de_df.get(m, k * 3 + l), num, 1e-9);
                }
            }
        }
    }
}
