//! Default-parameter registries
//!
//! One record type per configurable variant. The serde defaults on each field
//! are the canonical hyperparameters; the registry functions serialize the
//! `Default` value of every record into a flat JSON object keyed by the
//! variant's short lowercase name. Each record carries its own `name` key, so
//! a registry entry is a valid single factory layer on its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recognized optimizer names, sorted
pub const OPTIMIZER_NAMES: &[&str] = &[
    "adadelta", "adagrad", "adam", "adamax", "adamw", "asgd", "rmsprop", "rprop", "sgd",
];

/// Recognized scheduler names, sorted
pub const SCHEDULER_NAMES: &[&str] = &[
    "cosine_annealing",
    "cosine_warm_restarts",
    "cyclic",
    "exponential",
    "linear_warmup",
    "multistep",
    "none",
    "one_cycle",
    "plateau",
    "step",
    "warmup_cosine",
];

/// Recognized dataset names, sorted
pub const DATASET_NAMES: &[&str] = &["cifar-10", "cifar-100", "mnist"];

// Per-channel normalization statistics for the bundled dataset formats.
pub const MNIST_MEAN: [f32; 1] = [0.130_660_48];
pub const MNIST_STD: [f32; 1] = [0.308_107_81];
pub const CIFAR10_MEAN: [f32; 3] = [0.491_399_68, 0.482_158_41, 0.446_530_91];
pub const CIFAR10_STD: [f32; 3] = [0.247_032_23, 0.243_485_13, 0.261_587_84];
pub const CIFAR100_MEAN: [f32; 3] = [0.507_075_16, 0.486_548_87, 0.440_917_84];
pub const CIFAR100_STD: [f32; 3] = [0.267_334_29, 0.256_438_46, 0.276_150_47];

fn default_betas() -> (f32, f32) {
    (0.9, 0.999)
}

/// SGD parameters. `lr` has no default and must be supplied by some layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SgdParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lr: Option<f32>,
    #[serde(default)]
    pub momentum: f32,
    #[serde(default)]
    pub dampening: f32,
    #[serde(default)]
    pub weight_decay: f32,
    #[serde(default)]
    pub nesterov: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdamParams {
    #[serde(default = "AdamParams::default_lr")]
    pub lr: f32,
    #[serde(default = "default_betas")]
    pub betas: (f32, f32),
    #[serde(default = "AdamParams::default_eps")]
    pub eps: f32,
    #[serde(default)]
    pub weight_decay: f32,
    #[serde(default)]
    pub amsgrad: bool,
}

impl AdamParams {
    fn default_lr() -> f32 {
        1e-3
    }
    fn default_eps() -> f32 {
        1e-8
    }
}

impl Default for AdamParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            betas: default_betas(),
            eps: Self::default_eps(),
            weight_decay: 0.0,
            amsgrad: false,
        }
    }
}

/// AdamW shares Adam's parameter set but decouples (and defaults) the decay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdamWParams {
    #[serde(default = "AdamParams::default_lr")]
    pub lr: f32,
    #[serde(default = "default_betas")]
    pub betas: (f32, f32),
    #[serde(default = "AdamParams::default_eps")]
    pub eps: f32,
    #[serde(default = "AdamWParams::default_weight_decay")]
    pub weight_decay: f32,
    #[serde(default)]
    pub amsgrad: bool,
}

impl AdamWParams {
    fn default_weight_decay() -> f32 {
        0.01
    }
}

impl Default for AdamWParams {
    fn default() -> Self {
        Self {
            lr: AdamParams::default_lr(),
            betas: default_betas(),
            eps: AdamParams::default_eps(),
            weight_decay: Self::default_weight_decay(),
            amsgrad: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdadeltaParams {
    #[serde(default = "AdadeltaParams::default_lr")]
    pub lr: f32,
    #[serde(default = "AdadeltaParams::default_rho")]
    pub rho: f32,
    #[serde(default = "AdadeltaParams::default_eps")]
    pub eps: f32,
    #[serde(default)]
    pub weight_decay: f32,
}

impl AdadeltaParams {
    fn default_lr() -> f32 {
        1.0
    }
    fn default_rho() -> f32 {
        0.9
    }
    fn default_eps() -> f32 {
        1e-6
    }
}

impl Default for AdadeltaParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            rho: Self::default_rho(),
            eps: Self::default_eps(),
            weight_decay: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdagradParams {
    #[serde(default = "AdagradParams::default_lr")]
    pub lr: f32,
    #[serde(default)]
    pub lr_decay: f32,
    #[serde(default)]
    pub weight_decay: f32,
    #[serde(default)]
    pub initial_accumulator_value: f32,
    #[serde(default = "AdagradParams::default_eps")]
    pub eps: f32,
}

impl AdagradParams {
    fn default_lr() -> f32 {
        0.01
    }
    fn default_eps() -> f32 {
        1e-10
    }
}

impl Default for AdagradParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            lr_decay: 0.0,
            weight_decay: 0.0,
            initial_accumulator_value: 0.0,
            eps: Self::default_eps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdamaxParams {
    #[serde(default = "AdamaxParams::default_lr")]
    pub lr: f32,
    #[serde(default = "default_betas")]
    pub betas: (f32, f32),
    #[serde(default = "AdamParams::default_eps")]
    pub eps: f32,
    #[serde(default)]
    pub weight_decay: f32,
}

impl AdamaxParams {
    fn default_lr() -> f32 {
        2e-3
    }
}

impl Default for AdamaxParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            betas: default_betas(),
            eps: AdamParams::default_eps(),
            weight_decay: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AsgdParams {
    #[serde(default = "AsgdParams::default_lr")]
    pub lr: f32,
    #[serde(default = "AsgdParams::default_lambd")]
    pub lambd: f32,
    #[serde(default = "AsgdParams::default_alpha")]
    pub alpha: f32,
    #[serde(default = "AsgdParams::default_t0")]
    pub t0: f32,
    #[serde(default)]
    pub weight_decay: f32,
}

impl AsgdParams {
    fn default_lr() -> f32 {
        0.01
    }
    fn default_lambd() -> f32 {
        1e-4
    }
    fn default_alpha() -> f32 {
        0.75
    }
    fn default_t0() -> f32 {
        1e6
    }
}

impl Default for AsgdParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            lambd: Self::default_lambd(),
            alpha: Self::default_alpha(),
            t0: Self::default_t0(),
            weight_decay: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RmspropParams {
    #[serde(default = "RmspropParams::default_lr")]
    pub lr: f32,
    #[serde(default = "RmspropParams::default_alpha")]
    pub alpha: f32,
    #[serde(default = "AdamParams::default_eps")]
    pub eps: f32,
    #[serde(default)]
    pub weight_decay: f32,
    #[serde(default)]
    pub momentum: f32,
    #[serde(default)]
    pub centered: bool,
}

impl RmspropParams {
    fn default_lr() -> f32 {
        0.01
    }
    fn default_alpha() -> f32 {
        0.99
    }
}

impl Default for RmspropParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            alpha: Self::default_alpha(),
            eps: AdamParams::default_eps(),
            weight_decay: 0.0,
            momentum: 0.0,
            centered: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpropParams {
    #[serde(default = "RpropParams::default_lr")]
    pub lr: f32,
    #[serde(default = "RpropParams::default_etas")]
    pub etas: (f32, f32),
    #[serde(default = "RpropParams::default_step_sizes")]
    pub step_sizes: (f32, f32),
}

impl RpropParams {
    fn default_lr() -> f32 {
        0.01
    }
    fn default_etas() -> (f32, f32) {
        (0.5, 1.2)
    }
    fn default_step_sizes() -> (f32, f32) {
        (1e-6, 50.0)
    }
}

impl Default for RpropParams {
    fn default() -> Self {
        Self {
            lr: Self::default_lr(),
            etas: Self::default_etas(),
            step_sizes: Self::default_step_sizes(),
        }
    }
}

/// The "no scheduler" selection takes no parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoneParams {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<usize>,
    #[serde(default = "default_decay_gamma")]
    pub gamma: f32,
}

impl Default for StepParams {
    fn default() -> Self {
        Self { step_size: None, gamma: default_decay_gamma() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiStepParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<usize>>,
    #[serde(default = "default_decay_gamma")]
    pub gamma: f32,
}

impl Default for MultiStepParams {
    fn default() -> Self {
        Self { milestones: None, gamma: default_decay_gamma() }
    }
}

fn default_decay_gamma() -> f32 {
    0.1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExponentialParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CosineAnnealingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_max: Option<usize>,
    #[serde(default)]
    pub eta_min: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CosineWarmRestartsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_0: Option<usize>,
    #[serde(default = "CosineWarmRestartsParams::default_t_mult")]
    pub t_mult: usize,
    #[serde(default)]
    pub eta_min: f32,
}

impl CosineWarmRestartsParams {
    fn default_t_mult() -> usize {
        1
    }
}

impl Default for CosineWarmRestartsParams {
    fn default() -> Self {
        Self { t_0: None, t_mult: Self::default_t_mult(), eta_min: 0.0 }
    }
}

/// Direction of improvement for plateau monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateauModeName {
    Min,
    Max,
}

/// Threshold comparison style for plateau monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdModeName {
    Rel,
    Abs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlateauParams {
    #[serde(default = "PlateauParams::default_mode")]
    pub mode: PlateauModeName,
    #[serde(default = "default_decay_gamma")]
    pub factor: f32,
    #[serde(default = "PlateauParams::default_patience")]
    pub patience: usize,
    #[serde(default = "PlateauParams::default_threshold")]
    pub threshold: f32,
    #[serde(default = "PlateauParams::default_threshold_mode")]
    pub threshold_mode: ThresholdModeName,
    #[serde(default)]
    pub cooldown: usize,
    #[serde(default)]
    pub min_lr: f32,
    #[serde(default = "PlateauParams::default_eps")]
    pub eps: f32,
}

impl PlateauParams {
    fn default_mode() -> PlateauModeName {
        PlateauModeName::Min
    }
    fn default_patience() -> usize {
        10
    }
    fn default_threshold() -> f32 {
        1e-4
    }
    fn default_threshold_mode() -> ThresholdModeName {
        ThresholdModeName::Rel
    }
    fn default_eps() -> f32 {
        1e-8
    }
}

impl Default for PlateauParams {
    fn default() -> Self {
        Self {
            mode: Self::default_mode(),
            factor: default_decay_gamma(),
            patience: Self::default_patience(),
            threshold: Self::default_threshold(),
            threshold_mode: Self::default_threshold_mode(),
            cooldown: 0,
            min_lr: 0.0,
            eps: Self::default_eps(),
        }
    }
}

/// Amplitude scaling policy for the cyclic scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclicModeName {
    Triangular,
    Triangular2,
    ExpRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CyclicParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_lr: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lr: Option<f32>,
    #[serde(default = "CyclicParams::default_step_size_up")]
    pub step_size_up: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size_down: Option<usize>,
    #[serde(default = "CyclicParams::default_mode")]
    pub mode: CyclicModeName,
    #[serde(default = "CyclicParams::default_gamma")]
    pub gamma: f32,
}

impl CyclicParams {
    fn default_step_size_up() -> usize {
        2000
    }
    fn default_mode() -> CyclicModeName {
        CyclicModeName::Triangular
    }
    fn default_gamma() -> f32 {
        1.0
    }
}

impl Default for CyclicParams {
    fn default() -> Self {
        Self {
            base_lr: None,
            max_lr: None,
            step_size_up: Self::default_step_size_up(),
            step_size_down: None,
            mode: Self::default_mode(),
            gamma: Self::default_gamma(),
        }
    }
}

/// Annealing function for the one-cycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnealStrategyName {
    Cos,
    Linear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OneCycleParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lr: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<usize>,
    #[serde(default = "OneCycleParams::default_pct_start")]
    pub pct_start: f32,
    #[serde(default = "OneCycleParams::default_anneal_strategy")]
    pub anneal_strategy: AnnealStrategyName,
    #[serde(default = "OneCycleParams::default_div_factor")]
    pub div_factor: f32,
    #[serde(default = "OneCycleParams::default_final_div_factor")]
    pub final_div_factor: f32,
}

impl OneCycleParams {
    fn default_pct_start() -> f32 {
        0.3
    }
    fn default_anneal_strategy() -> AnnealStrategyName {
        AnnealStrategyName::Cos
    }
    fn default_div_factor() -> f32 {
        25.0
    }
    fn default_final_div_factor() -> f32 {
        1e4
    }
}

impl Default for OneCycleParams {
    fn default() -> Self {
        Self {
            max_lr: None,
            total_steps: None,
            pct_start: Self::default_pct_start(),
            anneal_strategy: Self::default_anneal_strategy(),
            div_factor: Self::default_div_factor(),
            final_div_factor: Self::default_final_div_factor(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearWarmupParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_steps: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarmupCosineParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_steps: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<usize>,
    #[serde(default)]
    pub eta_min: f32,
}

/// Shared dataset parameter record. Normalization statistics default per
/// variant; the registry fills them in, and a `None` reaching the factory
/// falls back to the variant's constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetParams {
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize_mean: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize_std: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_to: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<String>,
}

fn default_true() -> bool {
    true
}

fn dataset_record(mean: &[f32], std: &[f32]) -> DatasetParams {
    DatasetParams {
        normalize: true,
        normalize_mean: Some(mean.to_vec()),
        normalize_std: Some(std.to_vec()),
        resize_to: None,
        data_root: None,
    }
}

fn record(name: &'static str, params: impl Serialize) -> (&'static str, Map<String, Value>) {
    let mut map = match serde_json::to_value(params) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("name".to_string(), Value::String(name.to_string()));
    (name, map)
}

/// Registry of optimizer default-parameter records
pub fn optimizer_defaults() -> BTreeMap<&'static str, Map<String, Value>> {
    BTreeMap::from([
        record("adadelta", AdadeltaParams::default()),
        record("adagrad", AdagradParams::default()),
        record("adam", AdamParams::default()),
        record("adamax", AdamaxParams::default()),
        record("adamw", AdamWParams::default()),
        record("asgd", AsgdParams::default()),
        record("rmsprop", RmspropParams::default()),
        record("rprop", RpropParams::default()),
        record("sgd", SgdParams::default()),
    ])
}

/// Registry of learning-rate scheduler default-parameter records
pub fn scheduler_defaults() -> BTreeMap<&'static str, Map<String, Value>> {
    BTreeMap::from([
        record("cosine_annealing", CosineAnnealingParams::default()),
        record("cosine_warm_restarts", CosineWarmRestartsParams::default()),
        record("cyclic", CyclicParams::default()),
        record("exponential", ExponentialParams::default()),
        record("linear_warmup", LinearWarmupParams::default()),
        record("multistep", MultiStepParams::default()),
        record("none", NoneParams::default()),
        record("one_cycle", OneCycleParams::default()),
        record("plateau", PlateauParams::default()),
        record("step", StepParams::default()),
        record("warmup_cosine", WarmupCosineParams::default()),
    ])
}

/// Registry of dataset default-parameter records
pub fn dataset_defaults() -> BTreeMap<&'static str, Map<String, Value>> {
    BTreeMap::from([
        record("cifar-10", dataset_record(&CIFAR10_MEAN, &CIFAR10_STD)),
        record("cifar-100", dataset_record(&CIFAR100_MEAN, &CIFAR100_STD)),
        record("mnist", dataset_record(&MNIST_MEAN, &MNIST_STD)),
    ])
}
