//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// SGD with optional momentum, dampening, Nesterov acceleration, and L2
/// weight decay.
///
/// With momentum:
///   b_t = momentum * b_{t-1} + (1 - dampening) * g_t
///   g_t = nesterov ? g_t + momentum * b_t : b_t
///   θ_t = θ_{t-1} - lr * g_t
pub struct SGD {
    lr: f32,
    momentum: f32,
    dampening: f32,
    weight_decay: f32,
    nesterov: bool,
    velocities: Vec<Option<Array1<f32>>>,
}

impl SGD {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32, dampening: f32, weight_decay: f32, nesterov: bool) -> Self {
        Self { lr, momentum, dampening, weight_decay, nesterov, velocities: Vec::new() }
    }

    /// Plain SGD without momentum or weight decay
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.0, 0.0, 0.0, false)
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.velocities.is_empty() {
            self.velocities = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let mut g = if self.weight_decay != 0.0 {
                &grad + &(param.data() * self.weight_decay)
            } else {
                grad
            };

            if self.momentum != 0.0 {
                let buf = match &self.velocities[i] {
                    Some(b) => b * self.momentum + &g * (1.0 - self.dampening),
                    // First step seeds the buffer with the raw gradient
                    None => g.clone(),
                };
                g = if self.nesterov { &g + &(&buf * self.momentum) } else { buf.clone() };
                self.velocities[i] = Some(buf);
            }

            *param.data_mut() = param.data() - &(g * self.lr);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
