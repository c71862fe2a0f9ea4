//! Cosine annealing with warm restarts

use super::LRScheduler;
use std::f32::consts::PI;

/// Cosine annealing that restarts from lr_max every `t_i` steps, where the
/// period grows by `t_mult` after each restart.
pub struct CosineWarmRestartsLR {
    lr_max: f32,
    lr_min: f32,
    t_mult: usize,
    t_i: usize,
    t_cur: usize,
}

impl CosineWarmRestartsLR {
    /// Create a new warm-restart scheduler with initial period `t_0`
    pub fn new(lr_max: f32, t_0: usize, t_mult: usize, lr_min: f32) -> Self {
        Self { lr_max, lr_min, t_mult, t_i: t_0.max(1), t_cur: 0 }
    }

    /// Steps remaining until the next restart
    pub fn until_restart(&self) -> usize {
        self.t_i - self.t_cur
    }
}

impl LRScheduler for CosineWarmRestartsLR {
    fn get_lr(&self) -> f32 {
        let progress = self.t_cur as f32 / self.t_i as f32;
        let cosine_decay = 0.5 * (1.0 + (PI * progress).cos());
        self.lr_min + (self.lr_max - self.lr_min) * cosine_decay
    }

    fn step(&mut self) {
        self.t_cur += 1;
        if self.t_cur >= self.t_i {
            self.t_cur = 0;
            self.t_i *= self.t_mult.max(1);
        }
    }
}
