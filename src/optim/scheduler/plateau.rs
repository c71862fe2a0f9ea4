//! Metric-driven learning rate reduction

use super::LRScheduler;

/// Direction of improvement for the monitored metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateauMode {
    /// Lower metric is better (e.g. loss)
    Min,
    /// Higher metric is better (e.g. accuracy)
    Max,
}

/// How the improvement threshold is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMode {
    /// Relative to the best value seen
    Rel,
    /// Absolute difference from the best value
    Abs,
}

/// Reduces the learning rate by `factor` once the monitored metric stops
/// improving for `patience` consecutive observations. After a reduction the
/// scheduler ignores `cooldown` observations before counting again.
///
/// Drive it with [`LRScheduler::step_with_metric`]; plain `step()` ticks
/// without a metric and leaves the rate unchanged.
pub struct ReduceOnPlateau {
    lr: f32,
    mode: PlateauMode,
    factor: f32,
    patience: usize,
    threshold: f32,
    threshold_mode: ThresholdMode,
    cooldown: usize,
    min_lr: f32,
    eps: f32,
    best: Option<f32>,
    num_bad: usize,
    cooldown_counter: usize,
}

impl ReduceOnPlateau {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lr_initial: f32,
        mode: PlateauMode,
        factor: f32,
        patience: usize,
        threshold: f32,
        threshold_mode: ThresholdMode,
        cooldown: usize,
        min_lr: f32,
        eps: f32,
    ) -> Self {
        Self {
            lr: lr_initial,
            mode,
            factor,
            patience,
            threshold,
            threshold_mode,
            cooldown,
            min_lr,
            eps,
            best: None,
            num_bad: 0,
            cooldown_counter: 0,
        }
    }

    /// Plateau scheduler with the canonical defaults (min mode, factor 0.1,
    /// patience 10, rel threshold 1e-4)
    pub fn default_params(lr_initial: f32) -> Self {
        Self::new(lr_initial, PlateauMode::Min, 0.1, 10, 1e-4, ThresholdMode::Rel, 0, 0.0, 1e-8)
    }

    fn is_improvement(&self, metric: f32, best: f32) -> bool {
        match (self.mode, self.threshold_mode) {
            (PlateauMode::Min, ThresholdMode::Rel) => metric < best * (1.0 - self.threshold),
            (PlateauMode::Min, ThresholdMode::Abs) => metric < best - self.threshold,
            (PlateauMode::Max, ThresholdMode::Rel) => metric > best * (1.0 + self.threshold),
            (PlateauMode::Max, ThresholdMode::Abs) => metric > best + self.threshold,
        }
    }
}

impl LRScheduler for ReduceOnPlateau {
    fn get_lr(&self) -> f32 {
        self.lr
    }

    fn step(&mut self) {
        // No metric supplied: nothing to react to
    }

    fn step_with_metric(&mut self, metric: f32) {
        let improved = match self.best {
            None => true,
            Some(best) => self.is_improvement(metric, best),
        };

        if improved {
            self.best = Some(metric);
            self.num_bad = 0;
        } else {
            self.num_bad += 1;
        }

        if self.cooldown_counter > 0 {
            self.cooldown_counter -= 1;
            self.num_bad = 0;
        }

        if self.num_bad > self.patience {
            let new_lr = (self.lr * self.factor).max(self.min_lr);
            if self.lr - new_lr > self.eps {
                self.lr = new_lr;
            }
            self.cooldown_counter = self.cooldown;
            self.num_bad = 0;
        }
    }
}
