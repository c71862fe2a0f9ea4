//! Learning rate schedulers
//!
//! Scheduling strategies for training:
//! - `StepDecayLR` / `MultiStepLR` / `ExponentialLR` - multiplicative decay
//! - `CosineAnnealingLR` / `CosineWarmRestartsLR` - cosine schedules
//! - `LinearWarmupLR` / `WarmupCosineDecayLR` - warmup variants
//! - `ReduceOnPlateau` - metric-driven decay
//! - `OneCycleLR` / `CyclicLR` - cyclical policies

mod cosine_annealing;
mod cyclic;
mod exponential;
mod linear_warmup;
mod multi_step;
mod one_cycle;
mod plateau;
mod step_decay;
mod warm_restarts;
mod warmup_cosine_decay;

#[cfg(test)]
mod tests;

pub use cosine_annealing::CosineAnnealingLR;
pub use cyclic::{CyclicLR, CyclicMode};
pub use exponential::ExponentialLR;
pub use linear_warmup::LinearWarmupLR;
pub use multi_step::MultiStepLR;
pub use one_cycle::{AnnealStrategy, OneCycleLR};
pub use plateau::{PlateauMode, ReduceOnPlateau, ThresholdMode};
pub use step_decay::StepDecayLR;
pub use warm_restarts::CosineWarmRestartsLR;
pub use warmup_cosine_decay::WarmupCosineDecayLR;

use super::Optimizer;

/// Learning rate scheduler trait
pub trait LRScheduler {
    /// Get the current learning rate
    fn get_lr(&self) -> f32;

    /// Step the scheduler (typically called after each epoch or batch)
    fn step(&mut self);

    /// Step with a monitored metric; only metric-driven schedulers use the
    /// value, everything else falls through to [`LRScheduler::step`]
    fn step_with_metric(&mut self, _metric: f32) {
        self.step();
    }

    /// Apply the current learning rate to an optimizer
    fn apply(&self, optimizer: &mut dyn Optimizer) {
        optimizer.set_lr(self.get_lr());
    }
}
