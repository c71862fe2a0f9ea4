//! MNIST IDX file loading
//!
//! Parses the classic ubyte IDX pair: an image file with big-endian magic
//! 0x00000803 (dims: count, rows, cols) and a label file with magic
//! 0x00000801 (dims: count).

use std::fs;
use std::path::Path;

use ndarray::Array4;

use super::dataset::{mnist_classes, Dataset, DatasetPair};
use super::transform::Transform;
use crate::error::{Error, Result};

const IMAGE_MAGIC: u32 = 0x0000_0803;
const LABEL_MAGIC: u32 = 0x0000_0801;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn parse_images(path: &Path) -> Result<(usize, usize, usize, Vec<u8>)> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| Error::io(&display, e))?;
    if bytes.len() < 16 {
        return Err(Error::parse(&display, "truncated IDX image header"));
    }

    let magic = be_u32(&bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(Error::parse(&display, format!("bad IDX image magic {magic:#010x}")));
    }

    let count = be_u32(&bytes, 4) as usize;
    let rows = be_u32(&bytes, 8) as usize;
    let cols = be_u32(&bytes, 12) as usize;
    let expected = 16 + count * rows * cols;
    if bytes.len() != expected {
        return Err(Error::parse(
            &display,
            format!("expected {expected} bytes for {count} {rows}x{cols} images, got {}", bytes.len()),
        ));
    }

    Ok((count, rows, cols, bytes[16..].to_vec()))
}

fn parse_labels(path: &Path) -> Result<Vec<u32>> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| Error::io(&display, e))?;
    if bytes.len() < 8 {
        return Err(Error::parse(&display, "truncated IDX label header"));
    }

    let magic = be_u32(&bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(Error::parse(&display, format!("bad IDX label magic {magic:#010x}")));
    }

    let count = be_u32(&bytes, 4) as usize;
    if bytes.len() != 8 + count {
        return Err(Error::parse(
            &display,
            format!("expected {count} labels, got {}", bytes.len() - 8),
        ));
    }

    Ok(bytes[8..].iter().map(|&b| u32::from(b)).collect())
}

fn load_split(root: &Path, images: &str, labels: &str, transform: &Transform) -> Result<Dataset> {
    let image_path = root.join(images);
    let (count, rows, cols, pixels) = parse_images(&image_path)?;
    let labels = parse_labels(&root.join(labels))?;

    if labels.len() != count {
        return Err(Error::parse(
            image_path.display().to_string(),
            format!("{count} images but {} labels", labels.len()),
        ));
    }

    let scaled: Vec<f32> = pixels.iter().map(|&b| f32::from(b) / 255.0).collect();
    let images = Array4::from_shape_vec((count, 1, rows, cols), scaled)
        .map_err(|e| Error::parse(image_path.display().to_string(), e.to_string()))?;

    Ok(Dataset { images: transform.apply(images)?, labels, classes: mnist_classes() })
}

/// Load the MNIST train and test splits from `root`.
pub fn load_mnist(root: &Path, transform: &Transform) -> Result<DatasetPair> {
    log::info!("loading MNIST from {}", root.display());
    Ok(DatasetPair {
        train: load_split(root, TRAIN_IMAGES, TRAIN_LABELS, transform)?,
        test: load_split(root, TEST_IMAGES, TEST_LABELS, transform)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn write_images(dir: &Path, name: &str, count: u32, rows: u32, cols: u32, pixels: &[u8]) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&rows.to_be_bytes());
        bytes.extend_from_slice(&cols.to_be_bytes());
        bytes.extend_from_slice(pixels);
        fs::write(dir.join(name), bytes).unwrap();
    }

    fn write_labels(dir: &Path, name: &str, labels: &[u8]) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        fs::write(dir.join(name), bytes).unwrap();
    }

    fn write_fixture(dir: &Path) {
        // Two 2x2 train images, one test image
        write_images(dir, TRAIN_IMAGES, 2, 2, 2, &[0, 51, 102, 153, 204, 255, 0, 51]);
        write_labels(dir, TRAIN_LABELS, &[3, 7]);
        write_images(dir, TEST_IMAGES, 1, 2, 2, &[255, 0, 255, 0]);
        write_labels(dir, TEST_LABELS, &[1]);
    }

    #[test]
    fn test_loads_fixture_pair() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let pair = load_mnist(dir.path(), &Transform::default()).unwrap();
        assert_eq!(pair.train.len(), 2);
        assert_eq!(pair.test.len(), 1);
        assert_eq!(pair.train.images.dim(), (2, 1, 2, 2));
        assert_eq!(pair.train.labels, vec![3, 7]);
        assert_eq!(pair.train.classes.len(), 10);
        assert_relative_eq!(pair.train.images[(0, 0, 0, 1)], 51.0 / 255.0);
        assert_relative_eq!(pair.test.images[(0, 0, 0, 0)], 1.0);
    }

    #[test]
    fn test_normalization_applies() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let transform = Transform {
            resize_to: None,
            normalize: Some((vec![0.5], vec![0.5])),
        };
        let pair = load_mnist(dir.path(), &transform).unwrap();
        // 255 -> 1.0 -> (1.0 - 0.5) / 0.5 = 1.0; 0 -> -1.0
        assert_relative_eq!(pair.test.images[(0, 0, 0, 0)], 1.0);
        assert_relative_eq!(pair.test.images[(0, 0, 0, 1)], -1.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_mnist(dir.path(), &Transform::default()).err().unwrap();
        assert!(matches!(err, Error::Io { .. }), "{err}");
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        // Overwrite the train images with a label-magic header of full length
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&[0; 8]);
        fs::write(dir.path().join(TRAIN_IMAGES), bytes).unwrap();

        let err = load_mnist(dir.path(), &Transform::default()).err().unwrap();
        assert!(matches!(err, Error::Parse { .. }), "{err}");
        assert!(err.to_string().contains("magic"), "{err}");
    }

    #[test]
    fn test_truncated_pixels_rejected() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        write_images(dir.path(), TRAIN_IMAGES, 2, 2, 2, &[0, 51, 102]);

        let err = load_mnist(dir.path(), &Transform::default()).err().unwrap();
        assert!(matches!(err, Error::Parse { .. }), "{err}");
    }

    #[test]
    fn test_label_count_mismatch_rejected() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        write_labels(dir.path(), TRAIN_LABELS, &[3]);

        let err = load_mnist(dir.path(), &Transform::default()).err().unwrap();
        assert!(err.to_string().contains("labels"), "{err}");
    }
}
