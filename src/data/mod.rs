//! Dataset loading and preprocessing
//!
//! Loaders read the standard on-disk formats (MNIST IDX, CIFAR binary
//! batches) from a local directory; nothing is downloaded. The directory
//! comes from the dataset configuration's `data_root`, falling back to the
//! `EQUIPAR_DATA_DIR` environment variable.

mod cifar;
mod dataset;
mod mnist;
mod transform;

pub use cifar::{load_cifar10, load_cifar100};
pub use dataset::{mnist_classes, Dataset, DatasetPair, CIFAR100_CLASSES, CIFAR10_CLASSES};
pub use mnist::load_mnist;
pub use transform::Transform;

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable consulted when no `data_root` is configured
pub const DATA_DIR_ENV: &str = "EQUIPAR_DATA_DIR";

/// Resolve the dataset directory: explicit configuration first, then the
/// environment. The directory must already exist.
pub fn resolve_data_root(explicit: Option<&str>) -> Result<PathBuf> {
    let (origin, path) = match explicit {
        Some(path) => ("data_root", PathBuf::from(path)),
        None => match std::env::var(DATA_DIR_ENV) {
            Ok(path) => (DATA_DIR_ENV, PathBuf::from(path)),
            Err(_) => {
                return Err(Error::ConfigError(format!(
                    "no data_root configured and {DATA_DIR_ENV} is unset"
                )))
            }
        },
    };

    if !path.is_dir() {
        return Err(Error::ConfigError(format!(
            "{origin} '{}' is not a directory",
            path.display()
        )));
    }
    Ok(path)
}
