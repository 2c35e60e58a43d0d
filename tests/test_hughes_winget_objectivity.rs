use pmsub::base::MANDEL_IJ;
use pmsub::material::compute_stress_finite_strain;
use pmsub::prelude::*;
use pmsub::StrError;
use russell_lab::*;
use russell_tensor::{Mandel, Tensor2};

// Incremental objectivity of the Hughes-Winget algorithm
//
// TEST GOAL
//
// Verifies that a linear elastic (hypoelastic) material updated by the Hughes-Winget
// algorithm (1) keeps the stress magnitude under rigid rotations, (2) integrates a
// uniaxial stretch with the mid-point strain increments, and (3) gives the rotated stress
// when a constant rigid rotation is superposed to the whole deformation history.
//
// CONFIGURATION AND PARAMETERS
//
// * Young: E = 1000, Poisson: ν = 0.25
// * 3D (no idealization)

const YOUNG: f64 = 1000.0;
const POISSON: f64 = 0.25;

fn rotation_z(angle: f64) -> Matrix {
    let (s, c) = f64::sin_cos(angle);
    Matrix::from(&[[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
}

// Rotation about the (1,1,1) axis (Rodrigues formula)
fn rotation_oblique(angle: f64) -> Matrix {
    let n = 1.0 / f64::sqrt(3.0);
    let axis = [n, n, n];
    let (s, c) = f64::sin_cos(angle);
    let kk = Matrix::from(&[[0.0, -n, n], [n, 0.0, -n], [-n, n, 0.0]]);
    let mut q = Matrix::new(3, 3);
    for i in 0..3 {
        for j in 0..3 {
            let delta = if i == j { 1.0 } else { 0.0 };
            q.set(i, j, c * delta + s * kk.get(i, j) + (1.0 - c) * axis[i] * axis[j]);
        }
    }
    q
}

// Computes Q · T · Qᵀ
fn rotate(q: &Matrix, tt: &Tensor2) -> Tensor2 {
    let mut res = Tensor2::new(Mandel::Symmetric);
    for (i, j) in MANDEL_IJ {
        let mut value = 0.0;
        for m in 0..3 {
            for n in 0..3 {
                value += q.get(i, m) * tt.get(m, n) * q.get(j, n);
            }
        }
        res.sym_set(i, j, value);
    }
    res
}

// Runs the deformation history and returns the final stress
fn run(history: &[Matrix], stress_ini: &Tensor2) -> Result<Tensor2, StrError> {
    let ideal = Idealization::new(3);
    let mut model = LinearElastic::new(&ideal, YOUNG, POISSON);
    let mut state = LocalState::new(Mandel::Symmetric, 0);
    state.stress.set_tensor(1.0, stress_ini);
    let mut ds_df = Matrix::new(6, 9);
    for k in 1..history.len() {
        let convergence = compute_stress_finite_strain(
            &mut model,
            &mut state,
            &mut ds_df,
            &history[k - 1],
            &history[k],
            k as f64,
            1.0,
        )?;
        assert_eq!(convergence, Convergence::Converged);
    }
    Ok(state.stress)
}

fn initial_stress() -> Tensor2 {
    Tensor2::from_matrix(
        &[[-10.0, 2.0, 0.5], [2.0, -4.0, 1.0], [0.5, 1.0, -6.0]],
        Mandel::Symmetric,
    )
    .unwrap()
}

#[test]
fn test_rigid_rotation_keeps_the_stress() -> Result<(), StrError> {
    let n_increments = 7;
    let total_angle = 2.0 * std::f64::consts::PI / 3.0;
    let history: Vec<_> = (0..=n_increments)
        .map(|k| rotation_z(total_angle * (k as f64) / (n_increments as f64)))
        .collect();
    let stress = run(&history, &initial_stress())?;
    let correct = rotate(&rotation_z(total_angle), &initial_stress());
    vec_approx_eq(stress.vector(), correct.vector(), 1e-12);
    Ok(())
}

#[test]
fn test_uniaxial_stretch_uses_mid_point_strains() -> Result<(), StrError> {
    let n_increments = 5;
    let stretch = 0.02;
    let a: Vec<_> = (0..=n_increments)
        .map(|k| 1.0 + stretch * (k as f64) / (n_increments as f64))
        .collect();
    let history: Vec<_> = a
        .iter()
        .map(|ak| Matrix::from(&[[*ak, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]))
        .collect();
    let stress = run(&history, &Tensor2::new(Mandel::Symmetric))?;

    let mut strain = 0.0;
    for k in 1..a.len() {
        strain += 2.0 * (a[k] - a[k - 1]) / (a[k] + a[k - 1]);
    }
    approx_eq(strain, f64::ln(1.0 + stretch), 1e-6);
    let lambda = YOUNG * POISSON / ((1.0 + POISSON) * (1.0 - 2.0 * POISSON));
    let two_mu = YOUNG / (1.0 + POISSON);
    vec_approx_eq(
        stress.vector(),
        &[(lambda + two_mu) * strain, lambda * strain, lambda * strain, 0.0, 0.0, 0.0],
        1e-12,
    );
    Ok(())
}

#[test]
fn test_superposed_rotation_rotates_the_stress() -> Result<(), StrError> {
    // stretch, shear, and rotation
    let n_increments = 10;
    let history: Vec<_> = (0..=n_increments)
        .map(|k| {
            let t = (k as f64) / (n_increments as f64);
            let uu = Matrix::from(&[[1.0 + 0.05 * t, 0.02 * t, 0.0], [0.0, 1.0 - 0.01 * t, 0.03 * t], [0.0, 0.0, 1.0]]);
            let mut ff = Matrix::new(3, 3);
            mat_mat_mul(&mut ff, 1.0, &rotation_z(0.8 * t), &uu, 0.0).unwrap();
            ff
        })
        .collect();

    // the same history observed from a rotated frame: F' = Q · F
    let q = rotation_oblique(0.7);
    let history_rotated: Vec<_> = history
        .iter()
        .map(|ff| {
            let mut ff_rotated = Matrix::new(3, 3);
            mat_mat_mul(&mut ff_rotated, 1.0, &q, ff, 0.0).unwrap();
            ff_rotated
        })
        .collect();

    let stress = run(&history, &initial_stress())?;
    let stress_rotated = run(&history_rotated, &rotate(&q, &initial_stress()))?;
    let correct = rotate(&q, &stress);
    vec_approx_eq(stress_rotated.vector(), correct.vector(), 1e-11);

    // the stress is not trivially preserved
    let mut diff = Vector::new(6);
    vec_add(&mut diff, 1.0, stress.vector(), -1.0, initial_stress().vector())?;
    assert!(vec_norm(&diff, Norm::Max) > 1.0);
    Ok(())
}
