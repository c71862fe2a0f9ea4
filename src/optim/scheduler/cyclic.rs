//! Cyclical learning rate scheduler

use super::LRScheduler;

/// Amplitude scaling policy across cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclicMode {
    /// Constant amplitude
    Triangular,
    /// Amplitude halves every cycle
    Triangular2,
    /// Amplitude decays by gamma^step
    ExpRange,
}

/// Cycles the learning rate between `base_lr` and `max_lr` with a triangular
/// waveform: `step_size_up` steps rising, `step_size_down` steps falling.
pub struct CyclicLR {
    base_lr: f32,
    max_lr: f32,
    step_size_up: usize,
    step_size_down: usize,
    mode: CyclicMode,
    gamma: f32,
    current_step: usize,
}

impl CyclicLR {
    pub fn new(
        base_lr: f32,
        max_lr: f32,
        step_size_up: usize,
        step_size_down: Option<usize>,
        mode: CyclicMode,
        gamma: f32,
    ) -> Self {
        let up = step_size_up.max(1);
        Self {
            base_lr,
            max_lr,
            step_size_up: up,
            step_size_down: step_size_down.unwrap_or(up).max(1),
            mode,
            gamma,
            current_step: 0,
        }
    }

    /// Triangular policy with the canonical default half-cycle of 2000 steps
    pub fn default_params(base_lr: f32, max_lr: f32) -> Self {
        Self::new(base_lr, max_lr, 2000, None, CyclicMode::Triangular, 1.0)
    }

    /// Completed cycle count at the current step (1-based)
    fn cycle(&self) -> usize {
        1 + self.current_step / (self.step_size_up + self.step_size_down)
    }
}

impl LRScheduler for CyclicLR {
    fn get_lr(&self) -> f32 {
        let total = self.step_size_up + self.step_size_down;
        let pos = self.current_step % total;

        // Fraction of the peak amplitude at this position in the cycle
        let scale_x = if pos < self.step_size_up {
            pos as f32 / self.step_size_up as f32
        } else {
            1.0 - (pos - self.step_size_up) as f32 / self.step_size_down as f32
        };

        let amplitude_scale = match self.mode {
            CyclicMode::Triangular => 1.0,
            CyclicMode::Triangular2 => 1.0 / 2f32.powi(self.cycle() as i32 - 1),
            CyclicMode::ExpRange => self.gamma.powi(self.current_step as i32),
        };

        self.base_lr + (self.max_lr - self.base_lr) * scale_x * amplitude_scale
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}
