//! Rprop optimizer (resilient backpropagation)

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// Rprop adapts a per-element step size from the sign of successive
/// gradients, ignoring their magnitude. A sign agreement grows the step by
/// `eta_plus`, a sign flip shrinks it by `eta_minus` and skips the update.
/// Intended for full-batch gradients.
pub struct Rprop {
    lr: f32,
    eta_minus: f32,
    eta_plus: f32,
    step_min: f32,
    step_max: f32,
    prev_grad: Vec<Option<Array1<f32>>>,
    step_sizes: Vec<Option<Array1<f32>>>,
}

impl Rprop {
    /// Create a new Rprop optimizer.
    ///
    /// `etas` is `(eta_minus, eta_plus)` and `step_sizes` is the
    /// `(min, max)` clamp for the per-element step.
    pub fn new(lr: f32, etas: (f32, f32), step_sizes: (f32, f32)) -> Self {
        Self {
            lr,
            eta_minus: etas.0,
            eta_plus: etas.1,
            step_min: step_sizes.0,
            step_max: step_sizes.1,
            prev_grad: Vec::new(),
            step_sizes: Vec::new(),
        }
    }

    /// Rprop with the canonical defaults (η=(0.5, 1.2), steps=(1e-6, 50))
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, (0.5, 1.2), (1e-6, 50.0))
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.prev_grad.is_empty() {
            self.prev_grad = params.iter().map(|_| None).collect();
            self.step_sizes = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for Rprop {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let n = grad.len();
            let mut prev = self.prev_grad[i].clone().unwrap_or_else(|| Array1::zeros(n));
            let mut steps =
                self.step_sizes[i].clone().unwrap_or_else(|| Array1::from_elem(n, self.lr));

            let mut data = param.data();
            for j in 0..n {
                let mut g = grad[j];
                let sign = prev[j] * g;
                if sign > 0.0 {
                    steps[j] = (steps[j] * self.eta_plus).min(self.step_max);
                } else if sign < 0.0 {
                    steps[j] = (steps[j] * self.eta_minus).max(self.step_min);
                    // Sign flip: skip this update and forget the gradient so
                    // the next step is treated as a fresh direction
                    g = 0.0;
                }
                // signum(0.0) is 1.0, so a zero gradient must not update
                if g != 0.0 {
                    data[j] -= g.signum() * steps[j];
                }
                prev[j] = g;
            }
            *param.data_mut() = data;

            self.prev_grad[i] = Some(prev);
            self.step_sizes[i] = Some(steps);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
