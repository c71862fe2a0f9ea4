//! Configuration-driven component construction
//!
//! The pipeline is: parse a YAML [`Manifest`](schema::Manifest), validate it,
//! normalize each component selection into a factory layer, and hand the
//! layers to the [`build`] factories. Registry records in [`registry`]
//! document every variant's default parameters and double as factory layers.

pub mod build;
pub mod merge;
pub mod registry;
pub mod schema;
pub mod validate;

pub use build::{build_dataset, build_optimizer, build_scheduler};
pub use merge::merge_layers;
pub use registry::{dataset_defaults, optimizer_defaults, scheduler_defaults};
pub use schema::{load_manifest, Manifest, TrainGroup};
pub use validate::{validate_manifest, ValidationError};
