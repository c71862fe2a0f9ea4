use super::*;
use crate::optim::SGD;
use approx::assert_relative_eq;

#[test]
fn test_step_decay_boundaries() {
    let mut s = StepDecayLR::new(1.0, 3, 0.1);
    assert_relative_eq!(s.get_lr(), 1.0);
    s.step();
    s.step();
    assert_relative_eq!(s.get_lr(), 1.0); // epoch 2, no decay yet
    s.step();
    assert_relative_eq!(s.get_lr(), 0.1); // epoch 3
    for _ in 0..3 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 0.01, epsilon = 1e-9); // epoch 6
}

#[test]
fn test_step_decay_zero_step_size_is_constant() {
    let mut s = StepDecayLR::new(0.5, 0, 0.1);
    for _ in 0..10 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 0.5);
}

#[test]
fn test_multi_step_decays_at_milestones() {
    let mut s = MultiStepLR::new(1.0, vec![5, 2], 0.1);
    assert_relative_eq!(s.get_lr(), 1.0);
    s.step();
    s.step();
    assert_relative_eq!(s.get_lr(), 0.1); // epoch 2: first milestone
    s.step();
    s.step();
    s.step();
    assert_relative_eq!(s.get_lr(), 0.01, epsilon = 1e-9); // epoch 5
}

#[test]
fn test_exponential_decay() {
    let mut s = ExponentialLR::new(1.0, 0.5);
    assert_relative_eq!(s.get_lr(), 1.0);
    s.step();
    assert_relative_eq!(s.get_lr(), 0.5);
    s.step();
    assert_relative_eq!(s.get_lr(), 0.25);
}

#[test]
fn test_cosine_annealing_endpoints() {
    let mut s = CosineAnnealingLR::new(1.0, 10, 0.1);
    assert_relative_eq!(s.get_lr(), 1.0);

    for _ in 0..5 {
        s.step();
    }
    // Midpoint: (1.0 + 0.1) / 2
    assert_relative_eq!(s.get_lr(), 0.55, epsilon = 1e-5);

    for _ in 0..5 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 0.1);

    // Past t_max it stays at the floor
    s.step();
    assert_relative_eq!(s.get_lr(), 0.1);
}

#[test]
fn test_cosine_annealing_default_min_anneals_to_zero() {
    let mut s = CosineAnnealingLR::default_min(0.8, 4);
    assert_relative_eq!(s.get_lr(), 0.8);

    for _ in 0..4 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 0.0);
}

#[test]
fn test_warm_restarts_resets_to_peak() {
    let mut s = CosineWarmRestartsLR::new(1.0, 4, 1, 0.0);
    assert_relative_eq!(s.get_lr(), 1.0);

    for _ in 0..4 {
        s.step();
    }
    // Restarted: back at the peak
    assert_relative_eq!(s.get_lr(), 1.0);
}

#[test]
fn test_warm_restarts_period_grows_with_t_mult() {
    let mut s = CosineWarmRestartsLR::new(1.0, 2, 2, 0.0);
    assert_eq!(s.until_restart(), 2);
    s.step();
    s.step();
    // After the first restart the period doubles
    assert_eq!(s.until_restart(), 4);
}

#[test]
fn test_linear_warmup_ramps_and_holds() {
    let mut s = LinearWarmupLR::new(1.0, 4);
    assert_relative_eq!(s.get_lr(), 0.0);
    s.step();
    assert_relative_eq!(s.get_lr(), 0.25);
    for _ in 0..10 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 1.0);
}

#[test]
fn test_warmup_cosine_full_trajectory() {
    let mut s = WarmupCosineDecayLR::new(1.0, 2, 10, 0.0);
    assert_relative_eq!(s.get_lr(), 0.0);
    s.step();
    assert_relative_eq!(s.get_lr(), 0.5);
    s.step();
    // Warmup complete
    assert_relative_eq!(s.get_lr(), 1.0);
    for _ in 0..8 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 0.0, epsilon = 1e-6);
}

#[test]
fn test_plateau_reduces_after_patience() {
    let mut s = ReduceOnPlateau::new(
        1.0,
        PlateauMode::Min,
        0.5,
        2,
        1e-4,
        ThresholdMode::Rel,
        0,
        0.0,
        1e-8,
    );

    s.step_with_metric(1.0); // best = 1.0
    s.step_with_metric(1.0); // bad 1
    s.step_with_metric(1.0); // bad 2
    assert_relative_eq!(s.get_lr(), 1.0);
    s.step_with_metric(1.0); // bad 3 > patience: reduce
    assert_relative_eq!(s.get_lr(), 0.5);
}

#[test]
fn test_plateau_improvement_resets_counter() {
    let mut s = ReduceOnPlateau::new(
        1.0,
        PlateauMode::Min,
        0.5,
        2,
        1e-4,
        ThresholdMode::Abs,
        0,
        0.0,
        1e-8,
    );

    s.step_with_metric(1.0);
    s.step_with_metric(1.0);
    s.step_with_metric(1.0);
    s.step_with_metric(0.5); // improvement resets
    s.step_with_metric(0.5);
    s.step_with_metric(0.5);
    assert_relative_eq!(s.get_lr(), 1.0);
}

#[test]
fn test_plateau_max_mode() {
    let mut s = ReduceOnPlateau::new(
        1.0,
        PlateauMode::Max,
        0.1,
        0,
        1e-4,
        ThresholdMode::Rel,
        0,
        0.0,
        1e-8,
    );

    s.step_with_metric(0.5); // best = 0.5
    s.step_with_metric(0.9); // improvement for max mode
    assert_relative_eq!(s.get_lr(), 1.0);
    s.step_with_metric(0.8); // regression: patience 0, reduce immediately
    assert_relative_eq!(s.get_lr(), 0.1);
}

#[test]
fn test_plateau_respects_min_lr() {
    let mut s = ReduceOnPlateau::new(
        1.0,
        PlateauMode::Min,
        0.1,
        0,
        1e-4,
        ThresholdMode::Rel,
        0,
        0.05,
        1e-8,
    );

    s.step_with_metric(1.0);
    for _ in 0..10 {
        s.step_with_metric(2.0);
    }
    assert_relative_eq!(s.get_lr(), 0.05);
}

#[test]
fn test_plateau_plain_step_is_inert() {
    let mut s = ReduceOnPlateau::default_params(1.0);
    for _ in 0..100 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 1.0);
}

#[test]
fn test_one_cycle_peaks_at_pct_start() {
    let mut s = OneCycleLR::new(1.0, 10, 0.3, AnnealStrategy::Linear, 25.0, 1e4);
    assert_relative_eq!(s.get_lr(), 1.0 / 25.0);

    for _ in 0..3 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 1.0, epsilon = 1e-6);

    for _ in 0..7 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 1.0 / 25.0 / 1e4, epsilon = 1e-6);
}

#[test]
fn test_one_cycle_clamps_past_total() {
    let mut s = OneCycleLR::default_params(1.0, 10);
    for _ in 0..50 {
        s.step();
    }
    assert_relative_eq!(s.get_lr(), 1.0 / 25.0 / 1e4, epsilon = 1e-6);
}

#[test]
fn test_cyclic_triangular_waveform() {
    let mut s = CyclicLR::new(0.1, 1.1, 2, None, CyclicMode::Triangular, 1.0);
    assert_relative_eq!(s.get_lr(), 0.1);
    s.step();
    assert_relative_eq!(s.get_lr(), 0.6);
    s.step();
    assert_relative_eq!(s.get_lr(), 1.1); // peak
    s.step();
    assert_relative_eq!(s.get_lr(), 0.6);
    s.step();
    assert_relative_eq!(s.get_lr(), 0.1); // back at base, new cycle
}

#[test]
fn test_cyclic_triangular2_halves_amplitude() {
    let mut s = CyclicLR::new(0.0, 1.0, 1, None, CyclicMode::Triangular2, 1.0);
    s.step();
    assert_relative_eq!(s.get_lr(), 1.0); // first cycle peak
    s.step();
    s.step();
    assert_relative_eq!(s.get_lr(), 0.5); // second cycle peak
}

#[test]
fn test_cyclic_asymmetric_down_phase() {
    let mut s = CyclicLR::new(0.0, 1.0, 1, Some(3), CyclicMode::Triangular, 1.0);
    s.step();
    assert_relative_eq!(s.get_lr(), 1.0);
    s.step();
    assert_relative_eq!(s.get_lr(), 2.0 / 3.0, epsilon = 1e-6);
    s.step();
    assert_relative_eq!(s.get_lr(), 1.0 / 3.0, epsilon = 1e-6);
}

#[test]
fn test_apply_sets_optimizer_lr() {
    let mut opt = SGD::default_params(1.0);
    let mut s = ExponentialLR::new(1.0, 0.5);
    s.step();
    s.apply(&mut opt);
    assert_relative_eq!(crate::optim::Optimizer::lr(&opt), 0.5);
}
