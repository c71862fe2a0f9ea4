//! Linear warmup learning rate scheduler

use super::LRScheduler;

/// Ramps the learning rate linearly from 0 to `lr_target` over
/// `warmup_steps`, then holds it constant.
pub struct LinearWarmupLR {
    lr_target: f32,
    warmup_steps: usize,
    current_step: usize,
}

impl LinearWarmupLR {
    /// Create a new linear warmup scheduler
    pub fn new(lr_target: f32, warmup_steps: usize) -> Self {
        Self { lr_target, warmup_steps, current_step: 0 }
    }
}

impl LRScheduler for LinearWarmupLR {
    fn get_lr(&self) -> f32 {
        if self.warmup_steps == 0 || self.current_step >= self.warmup_steps {
            return self.lr_target;
        }
        self.lr_target * (self.current_step as f32 / self.warmup_steps as f32)
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}
