//! RMSprop optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// RMSprop scales gradients by a running average of their squared magnitude.
/// The centered variant subtracts the squared running mean of the gradient,
/// estimating the variance instead of the raw second moment.
pub struct RMSprop {
    lr: f32,
    alpha: f32,
    eps: f32,
    weight_decay: f32,
    momentum: f32,
    centered: bool,
    sq_avg: Vec<Option<Array1<f32>>>,
    grad_avg: Vec<Option<Array1<f32>>>,
    buf: Vec<Option<Array1<f32>>>,
}

impl RMSprop {
    /// Create a new RMSprop optimizer
    pub fn new(
        lr: f32,
        alpha: f32,
        eps: f32,
        weight_decay: f32,
        momentum: f32,
        centered: bool,
    ) -> Self {
        Self {
            lr,
            alpha,
            eps,
            weight_decay,
            momentum,
            centered,
            sq_avg: Vec::new(),
            grad_avg: Vec::new(),
            buf: Vec::new(),
        }
    }

    /// RMSprop with the canonical defaults (α=0.99, ε=1e-8)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.99, 1e-8, 0.0, 0.0, false)
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.sq_avg.is_empty() {
            self.sq_avg = params.iter().map(|_| None).collect();
            self.grad_avg = params.iter().map(|_| None).collect();
            self.buf = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for RMSprop {
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
                Some(s) => s * self.alpha + &g_sq * (1.0 - self.alpha),
                None => &g_sq * (1.0 - self.alpha),
            };

            let avg = if self.centered {
                let grad_avg_t = match &self.grad_avg[i] {
                    Some(a) => a * self.alpha + &g * (1.0 - self.alpha),
                    None => &g * (1.0 - self.alpha),
                };
                let centered_avg = &sq_avg_t - &(&grad_avg_t * &grad_avg_t);
                self.grad_avg[i] = Some(grad_avg_t);
                centered_avg
            } else {
                sq_avg_t.clone()
            };

            let denom = avg.mapv(f32::sqrt) + self.eps;

            if self.momentum > 0.0 {
                let prev = self.buf[i].clone().unwrap_or_else(|| Array1::zeros(n));
                let buf_t = prev * self.momentum + &(&g / &denom);
                *param.data_mut() = param.data() - &(&buf_t * self.lr);
                self.buf[i] = Some(buf_t);
            } else {
                *param.data_mut() = param.data() - &(&g / &denom * self.lr);
            }

            self.sq_avg[i] = Some(sq_avg_t);
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
        let mut opt = RMSprop::new(0.01, 0.99, 0.0, 0.0, 0.0, false);
        let param = Tensor::from_vec(vec![1.0], true);
        param.set_grad(arr1(&[2.0]));

        opt.step(&mut [param.clone()]);

        // sq_avg = 0.04, denom = 0.2, update = 0.01 * 2 / 0.2 = 0.1
        assert_relative_eq!(param.data()[0], 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_momentum_accumulates() {
        let mut opt = RMSprop::new(0.01, 0.99, 0.0, 0.0, 0.9, false);
        let param = Tensor::from_vec(vec![1.0], true);

        param.set_grad(arr1(&[2.0]));
        opt.step(&mut [param.clone()]);
        let first = 1.0 - param.data()[0];

        let before = param.data()[0];
        param.set_grad(arr1(&[2.0]));
        opt.step(&mut [param.clone()]);
        let second = before - param.data()[0];

        // Momentum carries the previous update forward
        assert!(second > first);
    }

    #[test]
    fn test_centered_differs_from_plain() {
        let mut plain = RMSprop::new(0.01, 0.99, 1e-8, 0.0, 0.0, false);
        let mut centered = RMSprop::new(0.01, 0.99, 1e-8, 0.0, 0.0, true);
        let p1 = Tensor::from_vec(vec![1.0], true);
        let p2 = Tensor::from_vec(vec![1.0], true);

        for _ in 0..3 {
            p1.set_grad(arr1(&[1.0]));
            p2.set_grad(arr1(&[1.0]));
            plain.step(&mut [p1.clone()]);
            centered.step(&mut [p2.clone()]);
        }
        assert!((p1.data()[0] - p2.data()[0]).abs() > 1e-6);
    }

    #[test]
    fn test_converges_on_quadratic() {
        let mut opt = RMSprop::default_params(0.01);
        let param = Tensor::from_vec(vec![3.0], true);

        for _ in 0..1000 {
            param.set_grad(param.data() * 2.0);
            opt.step(&mut [param.clone()]);
        }
        assert!(param.data()[0].abs() < 0.05);
    }
}
