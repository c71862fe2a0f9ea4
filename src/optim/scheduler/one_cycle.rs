//! One-cycle learning rate policy

use super::LRScheduler;
use std::f32::consts::PI;

/// Annealing function for the one-cycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealStrategy {
    Cos,
    Linear,
}

impl AnnealStrategy {
    fn anneal(self, start: f32, end: f32, pct: f32) -> f32 {
        match self {
            AnnealStrategy::Cos => end + (start - end) * 0.5 * (1.0 + (PI * pct).cos()),
            AnnealStrategy::Linear => start + (end - start) * pct,
        }
    }
}

/// One-cycle policy: anneal from `max_lr / div_factor` up to `max_lr` over
/// the first `pct_start` fraction of `total_steps`, then down to
/// `max_lr / div_factor / final_div_factor` over the remainder.
pub struct OneCycleLR {
    max_lr: f32,
    initial_lr: f32,
    min_lr: f32,
    total_steps: usize,
    up_steps: usize,
    strategy: AnnealStrategy,
    current_step: usize,
}

impl OneCycleLR {
    pub fn new(
        max_lr: f32,
        total_steps: usize,
        pct_start: f32,
        strategy: AnnealStrategy,
        div_factor: f32,
        final_div_factor: f32,
    ) -> Self {
        let initial_lr = max_lr / div_factor;
        let min_lr = initial_lr / final_div_factor;
        let up_steps = ((total_steps as f32 * pct_start) as usize).clamp(1, total_steps.max(1));
        Self { max_lr, initial_lr, min_lr, total_steps: total_steps.max(1), up_steps, strategy, current_step: 0 }
    }

    /// One-cycle with the canonical defaults (pct_start 0.3, cos anneal,
    /// div_factor 25, final_div_factor 1e4)
    pub fn default_params(max_lr: f32, total_steps: usize) -> Self {
        Self::new(max_lr, total_steps, 0.3, AnnealStrategy::Cos, 25.0, 1e4)
    }
}

impl LRScheduler for OneCycleLR {
    fn get_lr(&self) -> f32 {
        let t = self.current_step.min(self.total_steps);
        if t <= self.up_steps {
            let pct = t as f32 / self.up_steps as f32;
            self.strategy.anneal(self.initial_lr, self.max_lr, pct)
        } else {
            let down_steps = (self.total_steps - self.up_steps).max(1);
            let pct = (t - self.up_steps) as f32 / down_steps as f32;
            self.strategy.anneal(self.max_lr, self.min_lr, pct)
        }
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}
