//! Adam optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::{Array1, Zip};

/// Adam optimizer with bias-corrected first and second moments.
///
/// m_t = β1 * m_{t-1} + (1 - β1) * g_t
/// v_t = β2 * v_{t-1} + (1 - β2) * g_t²
/// θ_t = θ_{t-1} - lr * m̂_t / (√v̂_t + ε)
///
/// With `amsgrad`, the denominator uses the running elementwise maximum of
/// the bias-corrected second moment instead of the current value.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    weight_decay: f32,
    amsgrad: bool,
    t: u64,
    m: Vec<Option<Array1<f32>>>,
    v: Vec<Option<Array1<f32>>>,
    v_max: Vec<Option<Array1<f32>>>,
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(
        lr: f32,
        beta1: f32,
        beta2: f32,
        eps: f32,
        weight_decay: f32,
        amsgrad: bool,
    ) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            eps,
            weight_decay,
            amsgrad,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
            v_max: Vec::new(),
        }
    }

    /// Adam with the canonical defaults (β1=0.9, β2=0.999, ε=1e-8)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, 0.0, false)
    }

    /// Current step counter
    pub fn step_count(&self) -> u64 {
        self.t
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|_| None).collect();
            self.v = params.iter().map(|_| None).collect();
            self.v_max = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);
        self.t += 1;

        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let g = if self.weight_decay != 0.0 {
                &grad + &(param.data() * self.weight_decay)
            } else {
                grad
            };

            let m_t = match &self.m[i] {
                Some(m) => m * self.beta1 + &g * (1.0 - self.beta1),
                None => &g * (1.0 - self.beta1),
            };
            let g_sq = &g * &g;
            let v_t = match &self.v[i] {
                Some(v) => v * self.beta2 + &g_sq * (1.0 - self.beta2),
                None => &g_sq * (1.0 - self.beta2),
            };

            let m_hat = &m_t / bc1;
            let v_hat = &v_t / bc2;

            let denom_base = if self.amsgrad {
                let v_max_t = match &self.v_max[i] {
                    Some(prev) => Zip::from(prev).and(&v_hat).map_collect(|&a, &b| a.max(b)),
                    None => v_hat.clone(),
                };
                self.v_max[i] = Some(v_max_t.clone());
                v_max_t
            } else {
                v_hat
            };

            let update = &m_hat / &(denom_base.mapv(f32::sqrt) + self.eps) * self.lr;
            *param.data_mut() = param.data() - &update;

            self.m[i] = Some(m_t);
            self.v[i] = Some(v_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    #[test]
    fn test_first_step_matches_hand_computation() {
        let mut opt = Adam::new(0.1, 0.9, 0.999, 1e-8, 0.0, false);
        let param = Tensor::from_vec(vec![1.0], true);
        param.set_grad(arr1(&[1.0]));

        opt.step(&mut [param.clone()]);

        // m = 0.1, v = 0.001, m_hat = 1.0, v_hat = 1.0
        // update = 0.1 * 1.0 / (1.0 + 1e-8) ≈ 0.1
        assert_relative_eq!(param.data()[0], 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_amsgrad_denominator_never_shrinks() {
        let mut plain = Adam::new(0.1, 0.9, 0.999, 1e-8, 0.0, false);
        let mut ams = Adam::new(0.1, 0.9, 0.999, 1e-8, 0.0, true);
        let p_plain = Tensor::from_vec(vec![1.0], true);
        let p_ams = Tensor::from_vec(vec![1.0], true);

        // Large gradient then tiny gradient: amsgrad keeps the large
        // second-moment estimate, so its second update is smaller.
        for (g1, g2) in [(10.0, 0.01)] {
            p_plain.set_grad(arr1(&[g1]));
            p_ams.set_grad(arr1(&[g1]));
            plain.step(&mut [p_plain.clone()]);
            ams.step(&mut [p_ams.clone()]);

            let before_plain = p_plain.data()[0];
            let before_ams = p_ams.data()[0];
            p_plain.set_grad(arr1(&[g2]));
            p_ams.set_grad(arr1(&[g2]));
            plain.step(&mut [p_plain.clone()]);
            ams.step(&mut [p_ams.clone()]);

            let delta_plain = (before_plain - p_plain.data()[0]).abs();
            let delta_ams = (before_ams - p_ams.data()[0]).abs();
            assert!(delta_ams <= delta_plain);
        }
    }

    #[test]
    fn test_step_count_increments() {
        let mut opt = Adam::default_params(0.001);
        let param = Tensor::from_vec(vec![1.0], true);
        param.set_grad(arr1(&[1.0]));

        assert_eq!(opt.step_count(), 0);
        opt.step(&mut [param.clone()]);
        opt.step(&mut [param.clone()]);
        assert_eq!(opt.step_count(), 2);
    }

    #[test]
    fn test_converges_on_quadratic() {
        let mut opt = Adam::default_params(0.1);
        let param = Tensor::from_vec(vec![3.0], true);

        for _ in 0..500 {
            param.set_grad(param.data() * 2.0);
            opt.step(&mut [param.clone()]);
        }
        assert!(param.data()[0].abs() < 1e-2);
    }
}
