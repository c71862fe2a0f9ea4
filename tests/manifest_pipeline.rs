//! Manifest-to-components pipeline tests

use std::fs;
use std::path::Path;

use equipar::config::{
    build_dataset, build_optimizer, build_scheduler, validate_manifest, Manifest, ValidationError,
};
use serde_json::json;

fn write_idx_images(dir: &Path, name: &str, count: u32, pixels: &[u8]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x0000_0803u32.to_be_bytes());
    bytes.extend_from_slice(&count.to_be_bytes());
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(pixels);
    fs::write(dir.join(name), bytes).unwrap();
}

fn write_idx_labels(dir: &Path, name: &str, labels: &[u8]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x0000_0801u32.to_be_bytes());
    bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    bytes.extend_from_slice(labels);
    fs::write(dir.join(name), bytes).unwrap();
}

fn write_mnist_fixture(dir: &Path) {
    write_idx_images(dir, "train-images-idx3-ubyte", 2, &[0; 8]);
    write_idx_labels(dir, "train-labels-idx1-ubyte", &[4, 9]);
    write_idx_images(dir, "t10k-images-idx3-ubyte", 1, &[255; 4]);
    write_idx_labels(dir, "t10k-labels-idx1-ubyte", &[2]);
}

#[test]
fn manifest_composes_all_components() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data_dir = tempfile::TempDir::new().unwrap();
    write_mnist_fixture(data_dir.path());

    let yaml = format!(
        r"
project: digits
task: classification
data:
  name: mnist
  normalize: false
  data_root: {}
train:
  num_epochs: 3
  batch_size: 16
  optimizer:
    name: sgd
    lr: 0.05
    momentum: 0.9
  lr_scheduler:
    name: cosine_annealing
    t_max: 30
",
        data_dir.path().display()
    );

    let manifest = Manifest::from_yaml(&yaml).unwrap();
    validate_manifest(&manifest).unwrap();

    let optimizer = build_optimizer(&[manifest.optimizer_layer().unwrap()]).unwrap();
    assert!((optimizer.lr() - 0.05).abs() < 1e-9);

    let scheduler = build_scheduler(&[manifest.scheduler_layer().unwrap()], optimizer.lr())
        .unwrap()
        .unwrap();
    assert!((scheduler.get_lr() - 0.05).abs() < 1e-9);

    let pair = build_dataset(&[manifest.data_layer().unwrap()]).unwrap();
    assert_eq!(pair.train.len(), 2);
    assert_eq!(pair.test.labels, vec![2]);
    // normalize: false leaves raw [0, 1] pixels
    assert!((pair.test.images[(0, 0, 0, 0)] - 1.0).abs() < 1e-6);
}

#[test]
fn default_manifest_builds_sgd_only_with_lr() {
    let manifest = Manifest::from_yaml("{}").unwrap();
    validate_manifest(&manifest).unwrap();

    // The default optimizer is sgd, which requires an explicit lr layer
    let base = manifest.optimizer_layer().unwrap();
    assert!(build_optimizer(std::slice::from_ref(&base)).is_err());

    let lr_layer = match json!({"lr": 0.1}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let optimizer = build_optimizer(&[base, lr_layer]).unwrap();
    assert!((optimizer.lr() - 0.1).abs() < 1e-9);

    // And the default scheduler selection is none
    let scheduler = build_scheduler(&[manifest.scheduler_layer().unwrap()], 0.1).unwrap();
    assert!(scheduler.is_none());
}

#[test]
fn validation_rejects_bad_manifests_before_building() {
    let unknown = Manifest::from_yaml("data: imagenet\n").unwrap();
    assert_eq!(
        validate_manifest(&unknown),
        Err(ValidationError::UnknownName { category: "dataset", name: "imagenet".to_string() })
    );

    let bad_lr = Manifest::from_yaml("train:\n  optimizer:\n    name: adam\n    lr: 0\n").unwrap();
    assert_eq!(validate_manifest(&bad_lr), Err(ValidationError::NonPositiveLr(0.0)));
}

#[test]
fn dataset_overrides_flow_through_the_factory() {
    let data_dir = tempfile::TempDir::new().unwrap();
    write_mnist_fixture(data_dir.path());

    let yaml = format!(
        r"
data:
  name: mnist
  resize_to: [4, 4]
  data_root: {}
",
        data_dir.path().display()
    );
    let manifest = Manifest::from_yaml(&yaml).unwrap();
    let pair = build_dataset(&[manifest.data_layer().unwrap()]).unwrap();
    assert_eq!(pair.train.images.dim(), (2, 1, 4, 4));
}

#[test]
fn manifest_file_loads_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("train.yaml");
    fs::write(&path, "project: demo\ntrain:\n  optimizer: adamw\n").unwrap();

    let manifest = equipar::config::load_manifest(&path).unwrap();
    assert_eq!(manifest.project.as_deref(), Some("demo"));
    let optimizer = build_optimizer(&[manifest.optimizer_layer().unwrap()]).unwrap();
    assert!((optimizer.lr() - 1e-3).abs() < 1e-9);
}
