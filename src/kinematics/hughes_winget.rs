use super::{dd_dl, domega_dl};
use crate::base::{mandel_factor, MANDEL_IJ};
use crate::StrError;
use russell_lab::{mat_add, mat_inverse, mat_mat_mul, Matrix, Vector};
use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Implements the Hughes-Winget incremental objectivity algorithm
///
/// Given the deformation gradients at the beginning and end of an increment:
///
/// ```text
/// F½ = ½ (Fnew + Fold)
/// l  = (Fnew - Fold) · F½⁻¹          (velocity gradient × Δt)
/// Δε = sym(l)                         (stretching × Δt)
/// ΔΩ = skew(l)                        (spin × Δt)
/// ΔR = (I - ½ ΔΩ)⁻¹ · (I + ½ ΔΩ)
/// ```
///
/// The rotation ΔR (Cayley transform of the spin) is orthogonal for any skew ΔΩ.
pub struct HughesWinget {
    /// Holds the velocity gradient increment l (3×3)
    l: Matrix,

    /// Holds the spin increment ΔΩ (3×3)
    d_omega: Matrix,

    /// Holds the incremental rotation ΔR (3×3)
    d_rot: Matrix,

    /// Holds the strain increment Δε (Mandel)
    delta_strain: Tensor2,
}

impl HughesWinget {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `ff_old` -- (3×3) deformation gradient at the beginning of the increment
    /// * `ff_new` -- (3×3) deformation gradient at the end of the increment
    pub fn new(ff_old: &Matrix, ff_new: &Matrix) -> Result<Self, StrError> {
        if ff_old.dims() != (3, 3) || ff_new.dims() != (3, 3) {
            return Err("the deformation gradients must be 3×3");
        }

        // velocity gradient
        let mut ff_mid = Matrix::new(3, 3);
        let mut ff_mid_inv = Matrix::new(3, 3);
        let mut dff = Matrix::new(3, 3);
        let mut l = Matrix::new(3, 3);
        mat_add(&mut ff_mid, 0.5, ff_new, 0.5, ff_old)?;
        mat_add(&mut dff, 1.0, ff_new, -1.0, ff_old)?;
        let det = mat_inverse(&mut ff_mid_inv, &ff_mid)?;
        if det <= 0.0 {
            return Err("the mid-step deformation gradient must have a positive determinant");
        }
        mat_mat_mul(&mut l, 1.0, &dff, &ff_mid_inv, 0.0)?;

        // stretching and spin
        let mut delta_strain = Tensor2::new(Mandel::Symmetric);
        let mut d_omega = Matrix::new(3, 3);
        for i in 0..3 {
            for j in 0..3 {
                d_omega.set(i, j, 0.5 * (l.get(i, j) - l.get(j, i)));
            }
        }
        for (i, j) in MANDEL_IJ {
            delta_strain.sym_set(i, j, 0.5 * (l.get(i, j) + l.get(j, i)));
        }

        // rotation
        let mut a = Matrix::identity(3);
        let mut b = Matrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                a.set(i, j, a.get(i, j) - 0.5 * d_omega.get(i, j));
                b.set(i, j, b.get(i, j) + 0.5 * d_omega.get(i, j));
            }
        }
        let mut a_inv = Matrix::new(3, 3);
        mat_inverse(&mut a_inv, &a)?;
        let mut d_rot = Matrix::new(3, 3);
        mat_mat_mul(&mut d_rot, 1.0, &a_inv, &b, 0.0)?;

        Ok(HughesWinget {
            l,
            d_omega,
            d_rot,
            delta_strain,
        })
    }

    /// Returns the strain increment Δε (Mandel)
    pub fn strain_increment(&self) -> &Tensor2 {
        &self.delta_strain
    }

    /// Returns the spin increment ΔΩ
    pub fn rotation_increment(&self) -> &Matrix {
        &self.d_omega
    }

    /// Returns the incremental rotation ΔR
    pub fn rotation(&self) -> &Matrix {
        &self.d_rot
    }

    /// Returns the velocity gradient increment l
    pub fn velocity_gradient(&self) -> &Matrix {
        &self.l
    }

    /// Rotates a symmetric tensor: ΔR · T · ΔRᵀ
    pub fn rotate_tensor(&self, tt: &Tensor2) -> Result<Tensor2, StrError> {
        if tt.mandel() != Mandel::Symmetric {
            return Err("the tensor to be rotated must be symmetric and 3D");
        }
        let r = &self.d_rot;
        let mut res = Tensor2::new(Mandel::Symmetric);
        for (i, j) in MANDEL_IJ {
            let mut rij = 0.0;
            let mut rji = 0.0;
            for m in 0..3 {
                for n in 0..3 {
                    rij += r.get(i, m) * tt.get(m, n) * r.get(j, n);
                    rji += r.get(j, m) * tt.get(m, n) * r.get(i, n);
                }
            }
            res.sym_set(i, j, 0.5 * (rij + rji));
        }
        Ok(res)
    }

    /// Computes the derivative of the (rotated, updated) stress w.r.t. the deformation gradient
    ///
    /// Combines the small-strain tangent with the derivatives of the stretching and spin
    /// w.r.t. the velocity gradient, then applies ∂l/∂Fnew ≈ (·) F⁻ᵀ:
    ///
    /// ```text
    ///  ∂σₘ          ∂Dₙ       ∂Ωᵢₚ          ∂Ωⱼₚ
    /// ───── = Cₘₙ ───── + ( ───── σₚⱼ  +  ───── σᵢₚ ) s(i,j)
    ///  ∂lₖₗ        ∂lₖₗ      ∂lₖₗ          ∂lₖₗ
    ///
    ///  ∂σₘ         ∂σₘ
    /// ───── = Σ  ───── F⁻¹ₗₚ
    ///  ∂Fₖₗ    ₚ  ∂lₖₚ
    /// ```
    ///
    /// # Input
    ///
    /// * `stress` -- updated stress (Mandel, 3D)
    /// * `ff_inv` -- inverse of the deformation gradient at the end of the increment
    /// * `dd` -- small-strain (Jaumann) tangent ∂σ/∂ε
    ///
    /// # Output
    ///
    /// Returns a 6 × 9 matrix with the column of Fₖₗ at `k·3 + l`.
    pub fn compute_ds_df(&self, stress: &Tensor2, ff_inv: &Matrix, dd: &Tensor4) -> Result<Matrix, StrError> {
        if stress.mandel() != Mandel::Symmetric || dd.mandel() != Mandel::Symmetric {
            return Err("the stress and tangent must be symmetric and 3D");
        }
        if ff_inv.dims() != (3, 3) {
            return Err("the inverse deformation gradient must be 3×3");
        }
        let cc = dd.matrix();
        let mut ds_dl = [[[0.0; 3]; 3]; 6];
        for (m, (i, j)) in MANDEL_IJ.iter().enumerate() {
            let (i, j) = (*i, *j);
            for k in 0..3 {
                for l in 0..3 {
                    let mut rotational = 0.0;
                    for p in 0..3 {
                        rotational += domega_dl(i, p, k, l) * stress.get(p, j) + domega_dl(j, p, k, l) * stress.get(i, p);
                    }
                    let mut jaumann = 0.0;
                    for n in 0..6 {
                        jaumann += cc.get(m, n) * dd_dl(n, k, l);
                    }
                    ds_dl[m][k][l] = jaumann + rotational * mandel_factor(i, j);
                }
            }
        }
        let mut ds_df = Matrix::new(6, 9);
        for m in 0..6 {
            for k in 0..3 {
                for l in 0..3 {
                    let mut value = 0.0;
                    for p in 0..3 {
                        value += ds_dl[m][k][p] * ff_inv.get(l, p);
                    }
                    ds_df.set(m, k * 3 + l, value);
                }
            }
        }
        Ok(ds_df)
    }

    /// Computes the derivative of a scalar function of the strain increment w.r.t. F
    ///
    /// ```text
    ///  ∂f           ∂f   ∂Dₙ
    /// ───── = Σ  Σ ──── ───── F⁻¹ₗₚ
    ///  ∂Fₖₗ    ₚ  ₙ ∂Δεₙ  ∂lₖₚ
    /// ```
    ///
    /// # Input
    ///
    /// * `ff_inv` -- inverse of the deformation gradient at the end of the increment
    /// * `df_deps` -- (Mandel) derivative of the scalar w.r.t. the strain increment
    pub fn compute_dscalar_df(&self, ff_inv: &Matrix, df_deps: &Vector) -> Result<Matrix, StrError> {
        if ff_inv.dims() != (3, 3) {
            return Err("the inverse deformation gradient must be 3×3");
        }
        if df_deps.dim() != 6 {
            return Err("the derivative w.r.t. the strain increment must have 6 components");
        }
        let mut df_dl = Matrix::new(3, 3);
        for k in 0..3 {
            for l in 0..3 {
                let mut value = 0.0;
                for n in 0..6 {
                    value += df_deps[n] * dd_dl(n, k, l);
                }
                df_dl.set(k, l, value);
            }
        }
        let mut df_dff = Matrix::new(3, 3);
        for k in 0..3 {
            for l in 0..3 {
                let mut value = 0.0;
                for p in 0..3 {
                    value += df_dl.get(k, p) * ff_inv.get(l, p);
                }
                df_dff.set(k, l, value);
            }
        }
        Ok(df_dff)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
