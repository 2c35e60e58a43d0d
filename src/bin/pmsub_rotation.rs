use pmsub::prelude::*;
use pmsub::StrError;
use russell_lab::{mat_mat_mul, Matrix};
use serde::Serialize;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "pmsub_rotation",
    about = "Drives a linear elastic material through rotation plus stretch using adaptive substepping"
)]
struct Options {
    /// Young's modulus
    #[structopt(long, default_value = "1000.0")]
    young: f64,

    /// Poisson's coefficient
    #[structopt(long, default_value = "0.25")]
    poisson: f64,

    /// Total rotation angle about the z-axis (degrees)
    #[structopt(long, default_value = "90.0")]
    angle: f64,

    /// Total stretch along the x-axis (F₀₀ = 1 + stretch)
    #[structopt(long, default_value = "0.01")]
    stretch: f64,

    /// Number of increments
    #[structopt(long, default_value = "10")]
    n_increments: usize,
}

/// Holds the results of one increment
#[derive(Serialize)]
struct Record {
    increment: usize,
    time: f64,
    stress: Vec<f64>,
    n_calls: usize,
    accuracy_degraded: bool,
}

/// Computes F(t) = R(θ t) · diag(1 + λ t, 1, 1)
fn deformation_gradient(angle: f64, stretch: f64, t: f64) -> Result<Matrix, StrError> {
    let (s, c) = f64::sin_cos(angle * t);
    let rr = Matrix::from(&[[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]);
    let uu = Matrix::from(&[[1.0 + stretch * t, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    let mut ff = Matrix::new(3, 3);
    mat_mat_mul(&mut ff, 1.0, &rr, &uu, 0.0)?;
    Ok(ff)
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();
    if options.n_increments < 1 {
        return Err("the number of increments must be at least one");
    }

    // model
    let ideal = Idealization::new(3);
    let mut model = LinearElastic::new(&ideal, options.young, options.poisson);
    let cel = model.elastic_stiffness();
    let mut state = LocalState::new(ideal.mandel(), model.n_internal_values());
    let param = SampleParams::param_adaptive();

    // run
    let angle = options.angle * std::f64::consts::PI / 180.0;
    let dt = 1.0 / (options.n_increments as f64);
    let mut ff_old = deformation_gradient(angle, options.stretch, 0.0)?;
    for increment in 0..options.n_increments {
        let time_old = (increment as f64) * dt;
        let ff_new = deformation_gradient(angle, options.stretch, time_old + dt)?;
        let hw = HughesWinget::new(&ff_old, &ff_new)?;
        state.stress = hw.rotate_tensor(&state.stress)?;
        let stress_old = state.stress.vector().clone();
        let mut adapter = StrainDriven::new(&mut model, &cel, hw.strain_increment(), time_old, dt)?;
        let outcome = run_adaptive(
            &param,
            &cel,
            adapter.n_tangent(),
            &stress_old,
            &state.internal_values,
            &mut adapter,
            LogJournal,
        )?;
        let res = match outcome {
            IncrementOutcome::Finished(res) => res,
            IncrementOutcome::Cutback(_) => return Err("the increment requires a cutback"),
        };
        state.set_from_vectors(&res.stress, &res.state)?;
        let record = Record {
            increment,
            time: time_old + dt,
            stress: res.stress.as_data().to_vec(),
            n_calls: res.n_calls,
            accuracy_degraded: res.accuracy_degraded,
        };
        let line = serde_json::to_string(&record).map_err(|_| "cannot serialize the results")?;
        println!("{}", line);
        ff_old = ff_new;
    }
    Ok(())
}

