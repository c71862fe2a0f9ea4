//! Configuration-driven factories for training components.
//!
//! `equipar` maps declarative configuration to concrete training objects:
//! datasets, optimizers, and learning-rate schedulers. Each category has a
//! registry of default-parameter records and a factory that merges
//! configuration layers (later layers win) and dispatches on a
//! case-insensitive `name` key.
//!
//! ```no_run
//! use equipar::config::{build_optimizer, build_scheduler, Manifest};
//! use equipar::optim::Optimizer;
//!
//! let manifest = Manifest::from_yaml(r#"
//! project: demo
//! data: cifar-10
//! train:
//!   optimizer:
//!     name: adamw
//!     lr: 0.0003
//!   lr_scheduler: none
//! "#)?;
//!
//! let optimizer = build_optimizer(&[manifest.optimizer_layer()?])?;
//! let scheduler = build_scheduler(&[manifest.scheduler_layer()?], optimizer.lr())?;
//! assert!(scheduler.is_none());
//! # Ok::<(), equipar::Error>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod optim;
mod tensor;

pub use error::{Error, Result};
pub use tensor::Tensor;
