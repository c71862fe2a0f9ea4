//! Component factories
//!
//! Each factory merges its configuration layers right-biased, pops the `name`
//! key (trimmed, case-insensitive), and dispatches to the matching
//! constructor. The remaining keys deserialize into the variant's typed
//! parameter record, so defaults apply per field and unknown keys are
//! rejected.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::merge::merge_layers;
use super::registry::{
    AdadeltaParams, AdagradParams, AdamParams, AdamWParams, AdamaxParams, AnnealStrategyName,
    AsgdParams, CosineAnnealingParams, CosineWarmRestartsParams, CyclicModeName, CyclicParams,
    DatasetParams, ExponentialParams, LinearWarmupParams, MultiStepParams, OneCycleParams,
    PlateauModeName, PlateauParams, RmspropParams, RpropParams, SgdParams, StepParams,
    ThresholdModeName, WarmupCosineParams, CIFAR100_MEAN, CIFAR100_STD, CIFAR10_MEAN, CIFAR10_STD,
    DATASET_NAMES, MNIST_MEAN, MNIST_STD, OPTIMIZER_NAMES, SCHEDULER_NAMES,
};
use crate::data::{self, DatasetPair, Transform};
use crate::error::{Error, Result};
use crate::optim::scheduler::{AnnealStrategy, CyclicMode, PlateauMode, ThresholdMode};
use crate::optim::{
    Adadelta, Adagrad, Adam, AdamW, Adamax, CosineAnnealingLR, CosineWarmRestartsLR, CyclicLR,
    ExponentialLR, LRScheduler, LinearWarmupLR, MultiStepLR, OneCycleLR, Optimizer,
    RMSprop, ReduceOnPlateau, Rprop, StepDecayLR, WarmupCosineDecayLR, ASGD, SGD,
};

fn pop_name(merged: &mut Map<String, Value>, category: &'static str) -> Result<String> {
    match merged.remove("name") {
        Some(Value::String(raw)) => Ok(raw.trim().to_lowercase()),
        Some(other) => Err(Error::ConfigError(format!(
            "{category} 'name' must be a string, got {other}"
        ))),
        None => Err(Error::ConfigError(format!(
            "missing 'name' key in {category} configuration"
        ))),
    }
}

fn from_map<T: DeserializeOwned>(
    merged: Map<String, Value>,
    category: &'static str,
    name: &str,
) -> Result<T> {
    serde_json::from_value(Value::Object(merged)).map_err(|e| {
        Error::ConfigError(format!("invalid {category} parameters for '{name}': {e}"))
    })
}

fn required<T>(value: Option<T>, category: &'static str, name: &str, key: &str) -> Result<T> {
    value.ok_or_else(|| {
        Error::ConfigError(format!("{category} '{name}' requires '{key}' to be set"))
    })
}

/// Build an optimizer from configuration layers (later layers win).
pub fn build_optimizer(layers: &[Map<String, Value>]) -> Result<Box<dyn Optimizer>> {
    let mut merged = merge_layers(layers);
    let name = pop_name(&mut merged, "optimizer")?;
    log::debug!("building optimizer '{name}'");

    match name.as_str() {
        "sgd" => {
            let p: SgdParams = from_map(merged, "optimizer", "sgd")?;
            let lr = required(p.lr, "optimizer", "sgd", "lr")?;
            Ok(Box::new(SGD::new(lr, p.momentum, p.dampening, p.weight_decay, p.nesterov)))
        }
        "adam" => {
            let p: AdamParams = from_map(merged, "optimizer", "adam")?;
            Ok(Box::new(Adam::new(p.lr, p.betas.0, p.betas.1, p.eps, p.weight_decay, p.amsgrad)))
        }
        "adamw" => {
            let p: AdamWParams = from_map(merged, "optimizer", "adamw")?;
            Ok(Box::new(AdamW::new(p.lr, p.betas.0, p.betas.1, p.eps, p.weight_decay, p.amsgrad)))
        }
        "adadelta" => {
            let p: AdadeltaParams = from_map(merged, "optimizer", "adadelta")?;
            Ok(Box::new(Adadelta::new(p.lr, p.rho, p.eps, p.weight_decay)))
        }
        "adagrad" => {
            let p: AdagradParams = from_map(merged, "optimizer", "adagrad")?;
            Ok(Box::new(Adagrad::new(
                p.lr,
                p.lr_decay,
                p.weight_decay,
                p.initial_accumulator_value,
                p.eps,
            )))
        }
        "adamax" => {
            let p: AdamaxParams = from_map(merged, "optimizer", "adamax")?;
            Ok(Box::new(Adamax::new(p.lr, p.betas.0, p.betas.1, p.eps, p.weight_decay)))
        }
        "asgd" => {
            let p: AsgdParams = from_map(merged, "optimizer", "asgd")?;
            Ok(Box::new(ASGD::new(p.lr, p.lambd, p.alpha, p.t0, p.weight_decay)))
        }
        "rmsprop" => {
            let p: RmspropParams = from_map(merged, "optimizer", "rmsprop")?;
            Ok(Box::new(RMSprop::new(
                p.lr,
                p.alpha,
                p.eps,
                p.weight_decay,
                p.momentum,
                p.centered,
            )))
        }
        "rprop" => {
            let p: RpropParams = from_map(merged, "optimizer", "rprop")?;
            Ok(Box::new(Rprop::new(p.lr, p.etas, p.step_sizes)))
        }
        other => Err(Error::UnknownName {
            category: "optimizer",
            name: other.to_string(),
            valid: OPTIMIZER_NAMES.to_vec(),
        }),
    }
}

impl From<PlateauModeName> for PlateauMode {
    fn from(mode: PlateauModeName) -> Self {
        match mode {
            PlateauModeName::Min => PlateauMode::Min,
            PlateauModeName::Max => PlateauMode::Max,
        }
    }
}

impl From<ThresholdModeName> for ThresholdMode {
    fn from(mode: ThresholdModeName) -> Self {
        match mode {
            ThresholdModeName::Rel => ThresholdMode::Rel,
            ThresholdModeName::Abs => ThresholdMode::Abs,
        }
    }
}

impl From<CyclicModeName> for CyclicMode {
    fn from(mode: CyclicModeName) -> Self {
        match mode {
            CyclicModeName::Triangular => CyclicMode::Triangular,
            CyclicModeName::Triangular2 => CyclicMode::Triangular2,
            CyclicModeName::ExpRange => CyclicMode::ExpRange,
        }
    }
}

impl From<AnnealStrategyName> for AnnealStrategy {
    fn from(strategy: AnnealStrategyName) -> Self {
        match strategy {
            AnnealStrategyName::Cos => AnnealStrategy::Cos,
            AnnealStrategyName::Linear => AnnealStrategy::Linear,
        }
    }
}

/// Build a learning-rate scheduler from configuration layers. `base_lr` seeds
/// schedulers that derive their rate from the optimizer they will drive.
/// The `none` selection yields `Ok(None)`.
pub fn build_scheduler(
    layers: &[Map<String, Value>],
    base_lr: f32,
) -> Result<Option<Box<dyn LRScheduler>>> {
    let mut merged = merge_layers(layers);
    let name = pop_name(&mut merged, "lr_scheduler")?;
    log::debug!("building lr scheduler '{name}'");

    match name.as_str() {
        "none" => {
            // Residual keys on a "none" selection are still a config error
            from_map::<super::registry::NoneParams>(merged, "lr_scheduler", "none")?;
            Ok(None)
        }
        "step" => {
            let p: StepParams = from_map(merged, "lr_scheduler", "step")?;
            let step_size = required(p.step_size, "lr_scheduler", "step", "step_size")?;
            Ok(Some(Box::new(StepDecayLR::new(base_lr, step_size, p.gamma))))
        }
        "multistep" => {
            let p: MultiStepParams = from_map(merged, "lr_scheduler", "multistep")?;
            let milestones = required(p.milestones, "lr_scheduler", "multistep", "milestones")?;
            Ok(Some(Box::new(MultiStepLR::new(base_lr, milestones, p.gamma))))
        }
        "exponential" => {
            let p: ExponentialParams = from_map(merged, "lr_scheduler", "exponential")?;
            let gamma = required(p.gamma, "lr_scheduler", "exponential", "gamma")?;
            Ok(Some(Box::new(ExponentialLR::new(base_lr, gamma))))
        }
        "cosine_annealing" => {
            let p: CosineAnnealingParams = from_map(merged, "lr_scheduler", "cosine_annealing")?;
            let t_max = required(p.t_max, "lr_scheduler", "cosine_annealing", "t_max")?;
            Ok(Some(Box::new(CosineAnnealingLR::new(base_lr, t_max, p.eta_min))))
        }
        "cosine_warm_restarts" => {
            let p: CosineWarmRestartsParams =
                from_map(merged, "lr_scheduler", "cosine_warm_restarts")?;
            let t_0 = required(p.t_0, "lr_scheduler", "cosine_warm_restarts", "t_0")?;
            Ok(Some(Box::new(CosineWarmRestartsLR::new(base_lr, t_0, p.t_mult, p.eta_min))))
        }
        "plateau" => {
            let p: PlateauParams = from_map(merged, "lr_scheduler", "plateau")?;
            Ok(Some(Box::new(ReduceOnPlateau::new(
                base_lr,
                p.mode.into(),
                p.factor,
                p.patience,
                p.threshold,
                p.threshold_mode.into(),
                p.cooldown,
                p.min_lr,
                p.eps,
            ))))
        }
        "cyclic" => {
            let p: CyclicParams = from_map(merged, "lr_scheduler", "cyclic")?;
            let base = required(p.base_lr, "lr_scheduler", "cyclic", "base_lr")?;
            let max = required(p.max_lr, "lr_scheduler", "cyclic", "max_lr")?;
            Ok(Some(Box::new(CyclicLR::new(
                base,
                max,
                p.step_size_up,
                p.step_size_down,
                p.mode.into(),
                p.gamma,
            ))))
        }
        "one_cycle" => {
            let p: OneCycleParams = from_map(merged, "lr_scheduler", "one_cycle")?;
            let max_lr = required(p.max_lr, "lr_scheduler", "one_cycle", "max_lr")?;
            let total_steps = required(p.total_steps, "lr_scheduler", "one_cycle", "total_steps")?;
            Ok(Some(Box::new(OneCycleLR::new(
                max_lr,
                total_steps,
                p.pct_start,
                p.anneal_strategy.into(),
                p.div_factor,
                p.final_div_factor,
            ))))
        }
        "linear_warmup" => {
            let p: LinearWarmupParams = from_map(merged, "lr_scheduler", "linear_warmup")?;
            let warmup = required(p.warmup_steps, "lr_scheduler", "linear_warmup", "warmup_steps")?;
            Ok(Some(Box::new(LinearWarmupLR::new(base_lr, warmup))))
        }
        "warmup_cosine" => {
            let p: WarmupCosineParams = from_map(merged, "lr_scheduler", "warmup_cosine")?;
            let warmup = required(p.warmup_steps, "lr_scheduler", "warmup_cosine", "warmup_steps")?;
            let total = required(p.total_steps, "lr_scheduler", "warmup_cosine", "total_steps")?;
            Ok(Some(Box::new(WarmupCosineDecayLR::new(base_lr, warmup, total, p.eta_min))))
        }
        other => Err(Error::UnknownName {
            category: "lr_scheduler",
            name: other.to_string(),
            valid: SCHEDULER_NAMES.to_vec(),
        }),
    }
}

fn dataset_transform(params: &DatasetParams, mean: &[f32], std: &[f32]) -> Transform {
    Transform {
        resize_to: params.resize_to,
        normalize: params.normalize.then(|| {
            (
                params.normalize_mean.clone().unwrap_or_else(|| mean.to_vec()),
                params.normalize_std.clone().unwrap_or_else(|| std.to_vec()),
            )
        }),
    }
}

/// Build a train/test dataset pair from configuration layers. Loads the
/// dataset files from the configured `data_root`, falling back to
/// `$EQUIPAR_DATA_DIR`.
pub fn build_dataset(layers: &[Map<String, Value>]) -> Result<DatasetPair> {
    let mut merged = merge_layers(layers);
    let name = pop_name(&mut merged, "dataset")?;
    log::debug!("building dataset '{name}'");

    match name.as_str() {
        "mnist" => {
            let p: DatasetParams = from_map(merged, "dataset", "mnist")?;
            let root = data::resolve_data_root(p.data_root.as_deref())?;
            data::load_mnist(&root, &dataset_transform(&p, &MNIST_MEAN, &MNIST_STD))
        }
        "cifar-10" => {
            let p: DatasetParams = from_map(merged, "dataset", "cifar-10")?;
            let root = data::resolve_data_root(p.data_root.as_deref())?;
            data::load_cifar10(&root, &dataset_transform(&p, &CIFAR10_MEAN, &CIFAR10_STD))
        }
        "cifar-100" => {
            let p: DatasetParams = from_map(merged, "dataset", "cifar-100")?;
            let root = data::resolve_data_root(p.data_root.as_deref())?;
            data::load_cifar100(&root, &dataset_transform(&p, &CIFAR100_MEAN, &CIFAR100_STD))
        }
        other => Err(Error::UnknownName {
            category: "dataset",
            name: other.to_string(),
            valid: DATASET_NAMES.to_vec(),
        }),
    }
}
