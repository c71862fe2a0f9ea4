//! Training manifest schema
//!
//! A manifest is a small YAML document naming the dataset and the training
//! hyperparameters. Component selections (`data`, `train.optimizer`,
//! `train.lr_scheduler`) are either a bare name string or a map carrying a
//! `name` key plus per-parameter overrides; either form normalizes to a
//! single factory layer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

fn default_num_epochs() -> u32 {
    5
}

fn default_batch_size() -> u32 {
    32
}

fn default_data_selection() -> Value {
    Value::String("cifar-10".to_string())
}

fn default_optimizer_selection() -> Value {
    Value::String("sgd".to_string())
}

fn default_scheduler_selection() -> Value {
    Value::String("none".to_string())
}

/// Training hyperparameters and component selections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainGroup {
    #[serde(default = "default_num_epochs")]
    pub num_epochs: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(default = "default_optimizer_selection")]
    pub optimizer: Value,
    #[serde(default = "default_scheduler_selection")]
    pub lr_scheduler: Value,
}

impl Default for TrainGroup {
    fn default() -> Self {
        Self {
            num_epochs: default_num_epochs(),
            batch_size: default_batch_size(),
            optimizer: default_optimizer_selection(),
            lr_scheduler: default_scheduler_selection(),
        }
    }
}

/// Top-level training manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default = "default_data_selection")]
    pub data: Value,
    #[serde(default)]
    pub train: TrainGroup,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            project: None,
            task: None,
            comment: None,
            data: default_data_selection(),
            train: TrainGroup::default(),
        }
    }
}

/// Normalize a component selection to a factory layer. A bare string becomes
/// `{"name": ...}`; a map passes through unchanged.
pub fn selection_layer(category: &'static str, selection: &Value) -> Result<Map<String, Value>> {
    match selection {
        Value::String(name) => {
            let mut map = Map::new();
            map.insert("name".to_string(), Value::String(name.clone()));
            Ok(map)
        }
        Value::Object(map) => Ok(map.clone()),
        other => Err(Error::ConfigError(format!(
            "{category} selection must be a name or a map, got {other}"
        ))),
    }
}

impl Manifest {
    /// Parse a manifest from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| Error::ConfigError(format!("invalid manifest: {e}")))
    }

    /// Factory layer for the dataset selection
    pub fn data_layer(&self) -> Result<Map<String, Value>> {
        selection_layer("dataset", &self.data)
    }

    /// Factory layer for the optimizer selection
    pub fn optimizer_layer(&self) -> Result<Map<String, Value>> {
        selection_layer("optimizer", &self.train.optimizer)
    }

    /// Factory layer for the scheduler selection
    pub fn scheduler_layer(&self) -> Result<Map<String, Value>> {
        selection_layer("lr_scheduler", &self.train.lr_scheduler)
    }
}

/// Read and parse a manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    Manifest::from_yaml(&text)
}
