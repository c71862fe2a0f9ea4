//! Adagrad optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// Adagrad divides the learning rate by the root of the accumulated squared
/// gradients, with an optional per-step decay of the base rate:
///
/// lr_t = lr / (1 + (t - 1) * lr_decay)
/// θ_t = θ_{t-1} - lr_t * g_t / (√Σg² + ε)
pub struct Adagrad {
    lr: f32,
    lr_decay: f32,
    weight_decay: f32,
    initial_accumulator_value: f32,
    eps: f32,
    t: u64,
    state_sum: Vec<Option<Array1<f32>>>,
}

impl Adagrad {
    /// Create a new Adagrad optimizer
    pub fn new(
        lr: f32,
        lr_decay: f32,
        weight_decay: f32,
        initial_accumulator_value: f32,
        eps: f32,
    ) -> Self {
        Self { lr, lr_decay, weight_decay, initial_accumulator_value, eps, t: 0, state_sum: Vec::new() }
    }

    /// Adagrad with the canonical defaults (ε=1e-10)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.0, 0.0, 0.0, 1e-10)
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.state_sum.is_empty() {
            self.state_sum = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for Adagrad {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);
        self.t += 1;

        let clr = self.lr / (1.0 + (self.t - 1) as f32 * self.lr_decay);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let g = if self.weight_decay != 0.0 {
                &grad + &(param.data() * self.weight_decay)
            } else {
                grad
            };

            let sum = self.state_sum[i]
                .clone()
                .unwrap_or_else(|| Array1::from_elem(g.len(), self.initial_accumulator_value));
            let sum_t = &sum + &(&g * &g);

            let update = &g / &(sum_t.mapv(f32::sqrt) + self.eps) * clr;
            *param.data_mut() = param.data() - &update;

            self.state_sum[i] = Some(sum_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
