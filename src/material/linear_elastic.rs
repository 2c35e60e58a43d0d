use super::{Convergence, HypoElasticTrait, LocalState};
use crate::base::Idealization;
use crate::StrError;
use russell_lab::Matrix;
use russell_tensor::{t4_ddot_t2_update, LinElasticity, Tensor2, Tensor4};

/// Implements a linear elastic model
pub struct LinearElastic {
    pub model: LinElasticity,
}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, young: f64, poisson: f64) -> Self {
        LinearElastic {
            model: LinElasticity::new(young, poisson, ideal.two_dim(), ideal.plane_stress()),
        }
    }

    /// Returns a copy of the elastic stiffness matrix (Mandel basis)
    pub fn elastic_stiffness(&self) -> Matrix {
        self.model.get_modulus().matrix().clone()
    }
}

impl HypoElasticTrait for LinearElastic {
    fn n_internal_values(&self) -> usize {
        0
    }

    /// Updates the stress tensor given the strain increment tensor
    fn compute_stress(
        &mut self,
        state: &mut LocalState,
        dd: &mut Tensor4,
        delta_strain: &Tensor2,
        _time_old: f64,
        _dt: f64,
    ) -> Result<Convergence, StrError> {
        let modulus = self.model.get_modulus();
        t4_ddot_t2_update(&mut state.stress, 1.0, modulus, delta_strain, 1.0); // σ += D : Δε
        dd.set_tensor(1.0, modulus);
        state.elastic = true;
        Ok(Convergence::Converged)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinearElastic;
    use crate::base::Idealization;
    use crate::material::{Convergence, HypoElasticTrait, LocalState};
    use russell_lab::{mat_approx_eq, vec_approx_eq};
    use russell_tensor::{Tensor2, Tensor4};

    #[test]
    fn compute_stress_works() {
        let ideal = Idealization::new(2);
        let mut model = LinearElastic::new(&ideal, 3000.0, 0.2);
        assert_eq!(model.n_internal_values(), 0);

        let mandel = ideal.mandel();
        let mut state = LocalState::new(mandel, 0);
        state.elastic = false;
        let mut dd = Tensor4::new(mandel);
        let mut deps = Tensor2::new(mandel);
        deps.sym_set(0, 0, 0.001);
        let conv = model.compute_stress(&mut state, &mut dd, &deps, 0.0, 1.0).unwrap();
        assert_eq!(conv, Convergence::Converged);
        assert!(state.elastic);

        // λ = 833.33.., 2μ = 2500 (plane-strain)
        let lambda = 3000.0 * 0.2 / (1.2 * 0.6);
        vec_approx_eq(
            state.stress.vector(),
            &[(lambda + 2500.0) * 0.001, lambda * 0.001, lambda * 0.001, 0.0],
            1e-12,
        );
        mat_approx_eq(dd.matrix(), &model.elastic_stiffness(), 1e-15);
    }
}
