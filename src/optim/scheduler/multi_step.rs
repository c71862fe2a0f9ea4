//! Multi-step decay learning rate scheduler

use super::LRScheduler;

/// Multiplies the learning rate by gamma once per passed milestone epoch.
pub struct MultiStepLR {
    lr_initial: f32,
    milestones: Vec<usize>,
    gamma: f32,
    current_epoch: usize,
}

impl MultiStepLR {
    /// Create a new multi-step scheduler. Milestones are epoch indices; they
    /// are sorted internally so callers may pass them in any order.
    pub fn new(lr_initial: f32, mut milestones: Vec<usize>, gamma: f32) -> Self {
        milestones.sort_unstable();
        Self { lr_initial, milestones, gamma, current_epoch: 0 }
    }
}

impl LRScheduler for MultiStepLR {
    fn get_lr(&self) -> f32 {
        let num_decays = self.milestones.iter().filter(|&&m| m <= self.current_epoch).count();
        self.lr_initial * self.gamma.powi(num_decays as i32)
    }

    fn step(&mut self) {
        self.current_epoch += 1;
    }
}
