//! CIFAR binary batch loading
//!
//! CIFAR-10 batches store one label byte followed by 3072 pixel bytes
//! (channel-major: 1024 red, 1024 green, 1024 blue). CIFAR-100 prefixes each
//! record with a coarse label byte before the fine label; only the fine
//! label is kept.

use std::fs;
use std::path::Path;

use ndarray::Array4;

use super::dataset::{Dataset, DatasetPair, CIFAR100_CLASSES, CIFAR10_CLASSES};
use super::transform::Transform;
use crate::error::{Error, Result};

const IMAGE_BYTES: usize = 3 * 32 * 32;

const CIFAR10_TRAIN_BATCHES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];
const CIFAR10_TEST_BATCH: &str = "test_batch.bin";

const CIFAR100_TRAIN: &str = "train.bin";
const CIFAR100_TEST: &str = "test.bin";

/// Append one batch file's records. `label_bytes` is 1 for CIFAR-10 and 2
/// for CIFAR-100; the last label byte of each record is the one kept.
fn read_batch(
    path: &Path,
    label_bytes: usize,
    labels: &mut Vec<u32>,
    pixels: &mut Vec<u8>,
) -> Result<()> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| Error::io(&display, e))?;

    let record = label_bytes + IMAGE_BYTES;
    if bytes.is_empty() || bytes.len() % record != 0 {
        return Err(Error::parse(
            &display,
            format!("file length {} is not a multiple of the {record}-byte record", bytes.len()),
        ));
    }

    for chunk in bytes.chunks_exact(record) {
        labels.push(u32::from(chunk[label_bytes - 1]));
        pixels.extend_from_slice(&chunk[label_bytes..]);
    }
    Ok(())
}

fn assemble(
    labels: Vec<u32>,
    pixels: Vec<u8>,
    classes: &[&str],
    transform: &Transform,
) -> Result<Dataset> {
    let scaled: Vec<f32> = pixels.iter().map(|&b| f32::from(b) / 255.0).collect();
    let images = Array4::from_shape_vec((labels.len(), 3, 32, 32), scaled)
        .map_err(|e| Error::ConfigError(e.to_string()))?;

    // Fine labels must index into the class table
    if let Some(&bad) = labels.iter().find(|&&l| l as usize >= classes.len()) {
        return Err(Error::ConfigError(format!(
            "label {bad} out of range for {} classes",
            classes.len()
        )));
    }

    Ok(Dataset {
        images: transform.apply(images)?,
        labels,
        classes: classes.iter().map(|c| c.to_string()).collect(),
    })
}

/// Load the CIFAR-10 train batches and test batch from `root`.
pub fn load_cifar10(root: &Path, transform: &Transform) -> Result<DatasetPair> {
    log::info!("loading CIFAR-10 from {}", root.display());

    let mut train_labels = Vec::new();
    let mut train_pixels = Vec::new();
    for batch in CIFAR10_TRAIN_BATCHES {
        read_batch(&root.join(batch), 1, &mut train_labels, &mut train_pixels)?;
    }

    let mut test_labels = Vec::new();
    let mut test_pixels = Vec::new();
    read_batch(&root.join(CIFAR10_TEST_BATCH), 1, &mut test_labels, &mut test_pixels)?;

    Ok(DatasetPair {
        train: assemble(train_labels, train_pixels, &CIFAR10_CLASSES, transform)?,
        test: assemble(test_labels, test_pixels, &CIFAR10_CLASSES, transform)?,
    })
}

/// Load the CIFAR-100 train and test files from `root`, keeping fine labels.
pub fn load_cifar100(root: &Path, transform: &Transform) -> Result<DatasetPair> {
    log::info!("loading CIFAR-100 from {}", root.display());

    let mut train_labels = Vec::new();
    let mut train_pixels = Vec::new();
    read_batch(&root.join(CIFAR100_TRAIN), 2, &mut train_labels, &mut train_pixels)?;

    let mut test_labels = Vec::new();
    let mut test_pixels = Vec::new();
    read_batch(&root.join(CIFAR100_TEST), 2, &mut test_labels, &mut test_pixels)?;

    Ok(DatasetPair {
        train: assemble(train_labels, train_pixels, &CIFAR100_CLASSES, transform)?,
        test: assemble(test_labels, test_pixels, &CIFAR100_CLASSES, transform)?,
    })
}
