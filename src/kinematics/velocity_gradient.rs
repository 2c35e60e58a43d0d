use crate::base::{mandel_factor, MANDEL_IJ};

/// Returns the Kronecker delta
#[inline]
pub(crate) fn kron(i: usize, j: usize) -> f64 {
    if i == j {
        1.0
    } else {
        0.0
    }
}

/// Returns the derivative of the spin tensor w.r.t. the velocity gradient
///
/// ```text
///  ∂Ωᵢⱼ
/// ────── = ½ (δᵢₖ δⱼₗ - δₖⱼ δᵢₗ)
///  ∂lₖₗ
/// ```
#[inline]
pub fn domega_dl(i: usize, j: usize, k: usize, l: usize) -> f64 {
    0.5 * (kron(i, k) * kron(j, l) - kron(k, j) * kron(i, l))
}

/// Returns the derivative of the stretching tensor (Mandel component m) w.r.t. the velocity gradient
///
/// ```text
///  ∂Dₘ
/// ───── = ½ (δᵢₖ δⱼₗ + δⱼₖ δᵢₗ) · s(i,j)    with (i,j) = pair of m
///  ∂lₖₗ
/// ```
///
/// where `s(i,j)` is 1 on the diagonal and √2 otherwise.
#[inline]
pub fn dd_dl(m: usize, k: usize, l: usize) -> f64 {
    let (i, j) = MANDEL_IJ[m];
    0.5 * (kron(i, k) * kron(j, l) + kron(j, k) * kron(i, l)) * mandel_factor(i, j)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{dd_dl, domega_dl};
    use russell_lab::approx_eq;
    use russell_lab::Matrix;
    use russell_tensor::{Mandel, Tensor2};

    fn sample_l() -> Matrix {
        Matrix::from(&[[1.0, 2.0, 3.0], [-4.0, 5.0, 6.0], [0.5, -7.0, 8.0]])
    }

    #[test]
    fn domega_dl_recovers_the_spin() {
        let l = sample_l();
        for i in 0..3 {
            for j in 0..3 {
                let mut omega = 0.0;
                for k in 0..3 {
                    for m in 0..3 {
                        omega += domega_dl(i, j, k, m) * l.get(k, m);
                    }
                }
                approx_eq(omega, 0.5 * (l.get(i, j) - l.get(j, i)), 1e-15);
            }
        }
    }

    #[test]
    fn dd_dl_recovers_the_stretching_in_mandel_form() {
        let l = sample_l();
        let mut sym = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                sym[i][j] = 0.5 * (l.get(i, j) + l.get(j, i));
            }
        }
        let dd = Tensor2::from_matrix(&sym, Mandel::Symmetric).unwrap();
        for m in 0..6 {
            let mut value = 0.0;
            for k in 0..3 {
                for n in 0..3 {
                    value += dd_dl(m, k, n) * l.get(k, n);
                }
            }
            approx_eq(value, dd.vector()[m], 1e-14);
        }
    }
}
