//! Optimizers for training neural networks

mod adadelta;
mod adagrad;
mod adam;
mod adamax;
mod adamw;
mod asgd;
mod optimizer;
mod rmsprop;
mod rprop;
pub mod scheduler;
mod sgd;

pub use adadelta::Adadelta;
pub use adagrad::Adagrad;
pub use adam::Adam;
pub use adamax::Adamax;
pub use adamw::AdamW;
pub use asgd::ASGD;
pub use optimizer::Optimizer;
pub use rmsprop::RMSprop;
pub use rprop::Rprop;
pub use scheduler::{
    CosineAnnealingLR, CosineWarmRestartsLR, CyclicLR, ExponentialLR, LRScheduler, LinearWarmupLR,
    MultiStepLR, OneCycleLR, ReduceOnPlateau, StepDecayLR, WarmupCosineDecayLR,
};
pub use sgd::SGD;
