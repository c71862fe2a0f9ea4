//! AdamW optimizer (Adam with decoupled weight decay)

use super::Optimizer;
use crate::Tensor;
use ndarray::{Array1, Zip};

/// AdamW decouples weight decay from the gradient-based update. Instead of
/// folding the decay term into the gradient, it shrinks the parameters
/// directly before the adaptive update:
///
/// θ_t = (1 - lr * λ) * θ_{t-1} - lr * m̂_t / (√v̂_t + ε)
pub struct AdamW {
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

impl AdamW {
    /// Create a new AdamW optimizer
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

    /// AdamW with the canonical defaults (weight_decay = 0.01)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, 0.01, false)
    }

    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    fn ensure_state(&mut self, params: &[Tensor]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|_| None).collect();
            self.v = params.iter().map(|_| None).collect();
            self.v_max = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for AdamW {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params);
        self.t += 1;

        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(g) = param.grad() else { continue };

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

            let decay_factor = 1.0 - self.lr * self.weight_decay;
            *param.data_mut() = param.data() * decay_factor - &update;

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
