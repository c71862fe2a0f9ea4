//! Adamax optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::{Array1, Zip};

/// Adamax is the infinity-norm variant of Adam: the second moment is replaced
/// by an exponentially weighted running maximum of gradient magnitudes.
pub struct Adamax {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    weight_decay: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>,
    u: Vec<Option<Array1<f32>>>,
}

impl Adamax {
    /// Create a new Adamax optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, eps: f32, weight_decay: f32) -> Self {
        Self { lr, beta1, beta2, eps, weight_decay, t: 0, m: Vec::new(), u: Vec::new() }
    }

    /// Adamax with the canonical defaults (lr=2e-3)
    pub fn default_params() -> Self {
        Self::new(2e-3, 0.9, 0.999, 1e-8, 0.0)
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|_| None).collect();
            self.u = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for Adamax {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);
        self.t += 1;

        let bc1 = 1.0 - self.beta1.powi(self.t as i32);

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

            // u_t = max(β2 * u_{t-1}, |g| + ε)
            let g_abs = g.mapv(|x| x.abs() + self.eps);
            let u_t = match &self.u[i] {
                Some(u) => Zip::from(u).and(&g_abs).map_collect(|&u, &a| (u * self.beta2).max(a)),
                None => g_abs,
            };

            let update = &m_t / &u_t * (self.lr / bc1);
            *param.data_mut() = param.data() - &update;

            self.m[i] = Some(m_t);
            self.u[i] = Some(u_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
