//! Averaged Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// ASGD (Polyak-Ruppert averaging). The live parameters follow a decayed SGD
/// trajectory while a running average of the iterates is maintained once the
/// step counter passes `t0`. The averaged iterates are available through
/// [`ASGD::averaged`].
pub struct ASGD {
    lr: f32,
    lambd: f32,
    alpha: f32,
    t0: f32,
    weight_decay: f32,
    t: u64,
    eta: f32,
    mu: f32,
    ax: Vec<Option<Array1<f32>>>,
}

impl ASGD {
    /// Create a new ASGD optimizer
    pub fn new(lr: f32, lambd: f32, alpha: f32, t0: f32, weight_decay: f32) -> Self {
        Self { lr, lambd, alpha, t0, weight_decay, t: 0, eta: lr, mu: 1.0, ax: Vec::new() }
    }

    /// ASGD with the canonical defaults (λ=1e-4, α=0.75, t0=1e6)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 1e-4, 0.75, 1e6, 0.0)
    }

    /// Averaged iterate for parameter `i`, once at least one step has run
    pub fn averaged(&self, i: usize) -> Option<&Array1<f32>> {
        self.ax.get(i).and_then(Option::as_ref)
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.ax.is_empty() {
            self.ax = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for ASGD {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);
        self.t += 1;

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let g = if self.weight_decay != 0.0 {
                &grad + &(param.data() * self.weight_decay)
            } else {
                grad
            };

            // Decay then gradient step at the current eta
            let decayed = param.data() * (1.0 - self.lambd * self.eta);
            let new_data = decayed - &(g * self.eta);
            *param.data_mut() = new_data.clone();

            // Averaging kicks in when mu < 1 (i.e. t > t0)
            let ax_t = match &self.ax[i] {
                Some(ax) if self.mu != 1.0 => ax + &((&new_data - ax) * self.mu),
                _ => new_data,
            };
            self.ax[i] = Some(ax_t);
        }

        self.eta = self.lr / (1.0 + self.lambd * self.lr * self.t as f32).powf(self.alpha);
        self.mu = 1.0 / (self.t as f32 - self.t0).max(1.0);
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
        self.eta = lr;
    }
}
