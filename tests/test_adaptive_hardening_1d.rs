use plotpy::{Curve, Plot};
use pmsub::prelude::*;
use pmsub::StrError;
use russell_lab::*;

// Saturating hardening in 1D
//
// TEST GOAL
//
// Verifies that the adaptive substepper delivers a more accurate stress than the
// fixed-step substepper when the subincrements are integrated by forward Euler.
//
// MODEL
//
// dσ/dε = k (1 - σ/σy)  →  σ(ε) = σy (1 - exp(-k ε / σy))
//
// CONFIGURATION AND PARAMETERS
//
// * k = 1000, σy = 10, Δε = 0.005 (one increment starting from σ = 0)
// * Adaptive: tolerance = 1e-5
// * Fixed-step: initial size = 0.01

const NAME: &str = "test_adaptive_hardening_1d";
const SAVE_FIGURE: bool = false;

const K: f64 = 1000.0;
const SIGMA_Y: f64 = 10.0;
const DELTA_STRAIN: f64 = 0.005;

// Integrates each subincrement by forward Euler and records the subincrement sizes
struct Hardening {
    history: Vec<(f64, f64)>,
}

impl SubincrementIntegrator for Hardening {
    fn integrate(
        &mut self,
        start_stress: &Vector,
        start_state: &Vector,
        fraction: f64,
        progress_start: f64,
    ) -> Result<SubincrementOutcome, StrError> {
        self.history.push((progress_start, fraction));
        let ratio = 1.0 - start_stress[0] / SIGMA_Y;
        let stress = start_stress[0] + K * ratio * fraction * DELTA_STRAIN;
        Ok(SubincrementOutcome::Inelastic {
            stress: Vector::from(&[stress]),
            state: Vector::from(&[start_state[0] + fraction * DELTA_STRAIN]),
            local_tangent: Matrix::from(&[[ratio]]),
        })
    }
}

fn analytical_stress(strain: f64) -> f64 {
    SIGMA_Y * (1.0 - f64::exp(-K * strain / SIGMA_Y))
}

#[test]
fn test_adaptive_hardening_1d() -> Result<(), StrError> {
    let cel = Matrix::from(&[[K]]);
    let stress_old = Vector::new(1);
    let state_old = Vector::new(1);
    let correct = analytical_stress(DELTA_STRAIN);

    // adaptive
    let mut param = SampleParams::param_adaptive();
    param.error_tolerance = 1e-5;
    let journal = RecordingJournal::new();
    let mut adaptive = Hardening { history: Vec::new() };
    let res_adaptive = match run_adaptive(&param, &cel, 1, &stress_old, &state_old, &mut adaptive, &journal)? {
        IncrementOutcome::Finished(res) => res,
        IncrementOutcome::Cutback(_) => panic!("the adaptive substepper must not cut back"),
    };
    assert!(!res_adaptive.accuracy_degraded);
    approx_eq(res_adaptive.state[0], DELTA_STRAIN, 1e-14);
    let error_adaptive = f64::abs(res_adaptive.stress[0] - correct);
    println!("adaptive: n_calls = {}, error = {:e}", res_adaptive.n_calls, error_adaptive);
    assert!(error_adaptive < 1e-3);

    // the stiffness is positive and softer than the initial stiffness
    let stiffness = res_adaptive.stiffness.get(0, 0);
    assert!(stiffness > 0.0 && stiffness < K);

    // fixed-step
    let mut param = SampleParams::param_fixed_step();
    param.initial_step_size = 0.01;
    let mut fixed = Hardening { history: Vec::new() };
    let res_fixed = match run_fixed_step(&param, &cel, 1, &stress_old, &state_old, &mut fixed, &journal)? {
        IncrementOutcome::Finished(res) => res,
        IncrementOutcome::Cutback(_) => panic!("the fixed-step substepper must not cut back"),
    };
    let error_fixed = f64::abs(res_fixed.stress[0] - correct);
    println!("fixed-step: n_calls = {}, error = {:e}", res_fixed.n_calls, error_fixed);
    assert!(error_adaptive < error_fixed);

    // the last subincrement (a second half step) ends at the end of the increment
    let (progress_start, fraction) = adaptive.history[adaptive.history.len() - 1];
    approx_eq(progress_start + fraction, 1.0, 1e-12);
    for (progress_start, fraction) in &adaptive.history {
        assert!(*progress_start >= 0.0 && *progress_start < 1.0);
        assert!(*fraction > 0.0 && *fraction <= 1.0);
    }

    // a full-step call is followed by its first half step (same start, half the size)
    let full_steps: Vec<_> = adaptive
        .history
        .windows(2)
        .filter(|w| w[1].0 == w[0].0 && w[1].1 == 0.5 * w[0].1)
        .map(|w| w[0])
        .collect();
    assert_eq!(full_steps[0], (0.0, 1.0));
    assert!(3 * full_steps.len() <= adaptive.history.len());

    // plot results
    if SAVE_FIGURE {
        let x: Vec<_> = full_steps.iter().map(|(p, _)| *p).collect();
        let y: Vec<_> = full_steps.iter().map(|(_, h)| *h).collect();
        let mut curve = Curve::new();
        curve
            .set_label("adaptive")
            .set_line_style("None")
            .set_marker_style("o")
            .set_marker_color("blue")
            .set_marker_line_color("blue");
        curve.draw(&x, &y);
        let mut plot = Plot::new();
        plot.add(&curve)
            .set_title("subincrement sizes")
            .grid_labels_legend("progress", "size")
            .set_figure_size_points(600.0, 300.0)
            .save(&format!("/tmp/pmsub/{}.svg", NAME))?;
    }
    Ok(())
}
