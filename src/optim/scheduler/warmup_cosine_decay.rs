//! Combined linear warmup and cosine decay

use super::LRScheduler;
use std::f32::consts::PI;

/// Linear warmup from 0 to `lr_max` over `warmup_steps`, followed by a
/// cosine decay down to `lr_min` over the remaining steps.
pub struct WarmupCosineDecayLR {
    lr_max: f32,
    lr_min: f32,
    warmup_steps: usize,
    total_steps: usize,
    current_step: usize,
}

impl WarmupCosineDecayLR {
    /// Create a new warmup + cosine decay scheduler
    pub fn new(lr_max: f32, warmup_steps: usize, total_steps: usize, lr_min: f32) -> Self {
        Self { lr_max, lr_min, warmup_steps, total_steps, current_step: 0 }
    }
}

impl LRScheduler for WarmupCosineDecayLR {
    fn get_lr(&self) -> f32 {
        if self.current_step < self.warmup_steps {
            if self.warmup_steps == 0 {
                return self.lr_max;
            }
            return self.lr_max * (self.current_step as f32 / self.warmup_steps as f32);
        }

        let decay_steps = self.total_steps.saturating_sub(self.warmup_steps);
        if decay_steps == 0 || self.current_step >= self.total_steps {
            return self.lr_min;
        }

        let progress = (self.current_step - self.warmup_steps) as f32 / decay_steps as f32;
        let cosine_decay = 0.5 * (1.0 + (PI * progress).cos());
        self.lr_min + (self.lr_max - self.lr_min) * cosine_decay
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}
