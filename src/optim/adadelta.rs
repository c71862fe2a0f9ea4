//! Adadelta optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// Adadelta adapts learning rates from a window of squared gradients and
/// squared updates, so `lr` acts only as a final scaling factor (1.0 in the
/// original paper).
pub struct Adadelta {
    lr: f32,
    rho: f32,
    eps: f32,
    weight_decay: f32,
    sq_avg: Vec<Option<Array1<f32>>>,
    acc_delta: Vec<Option<Array1<f32>>>,
}

impl Adadelta {
    /// Create a new Adadelta optimizer
    pub fn new(lr: f32, rho: f32, eps: f32, weight_decay: f32) -> Self {
        Self { lr, rho, eps, weight_decay, sq_avg: Vec::new(), acc_delta: Vec::new() }
    }

    /// Adadelta with the canonical defaults (lr=1.0, ρ=0.9, ε=1e-6)
    pub fn default_params() -> Self {
        Self::new(1.0, 0.9, 1e-6, 0.0)
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.sq_avg.is_empty() {
            self.sq_avg = params.iter().map(|_| None).collect();
            self.acc_delta = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for Adadelta {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let g = if self.weight_decay != 0.0 {
                &grad + &(param.data() * self.weight_decay)
            } else {
                grad
            };

            let n = g.len();
            let g_sq = &g * &g;
            let sq_avg_t = match &self.sq_avg[i] {
                Some(s) => s * self.rho + &g_sq * (1.0 - self.rho),
                None => &g_sq * (1.0 - self.rho),
            };
            let acc = self.acc_delta[i].clone().unwrap_or_else(|| Array1::zeros(n));

            // delta = √(acc + ε) / √(sq_avg + ε) * g
            let delta = (acc.mapv(|a| (a + self.eps).sqrt())
                / sq_avg_t.mapv(|s| (s + self.eps).sqrt()))
                * &g;

            let acc_t = &acc * self.rho + &(&delta * &delta) * (1.0 - self.rho);
            *param.data_mut() = param.data() - &(&delta * self.lr);

            self.sq_avg[i] = Some(sq_avg_t);
            self.acc_delta[i] = Some(acc_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
