//! Manifest validation
//!
//! Catches structural mistakes before any component is constructed: zero
//! loop counts, unrecognized component names, non-positive learning rates.
//! Per-parameter typing is left to the factories.

use serde_json::Value;
use thiserror::Error;

use super::registry::{DATASET_NAMES, OPTIMIZER_NAMES, SCHEDULER_NAMES};
use super::schema::{selection_layer, Manifest};

/// Manifest-level validation failures
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("train.num_epochs must be positive")]
    ZeroEpochs,

    #[error("train.batch_size must be positive")]
    ZeroBatchSize,

    #[error("unknown {category} '{name}'")]
    UnknownName { category: &'static str, name: String },

    #[error("malformed {category} selection: {reason}")]
    Malformed { category: &'static str, reason: String },

    #[error("learning rate must be positive, got {0}")]
    NonPositiveLr(f64),
}

fn check_selection(
    category: &'static str,
    selection: &Value,
    known: &[&str],
) -> Result<(), ValidationError> {
    let layer = selection_layer(category, selection)
        .map_err(|e| ValidationError::Malformed { category, reason: e.to_string() })?;

    let name = match layer.get("name") {
        Some(Value::String(raw)) => raw.trim().to_lowercase(),
        Some(other) => {
            return Err(ValidationError::Malformed {
                category,
                reason: format!("'name' must be a string, got {other}"),
            })
        }
        None => {
            return Err(ValidationError::Malformed {
                category,
                reason: "missing 'name' key".to_string(),
            })
        }
    };

    if !known.contains(&name.as_str()) {
        return Err(ValidationError::UnknownName { category, name });
    }

    if let Some(lr) = layer.get("lr") {
        match lr.as_f64() {
            Some(lr) if lr > 0.0 => {}
            Some(lr) => return Err(ValidationError::NonPositiveLr(lr)),
            None => {
                return Err(ValidationError::Malformed {
                    category,
                    reason: format!("'lr' must be a number, got {lr}"),
                })
            }
        }
    }

    Ok(())
}

/// Validate a manifest before composing components from it.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), ValidationError> {
    if manifest.train.num_epochs == 0 {
        return Err(ValidationError::ZeroEpochs);
    }
    if manifest.train.batch_size == 0 {
        return Err(ValidationError::ZeroBatchSize);
    }

    check_selection("dataset", &manifest.data, DATASET_NAMES)?;
    check_selection("optimizer", &manifest.train.optimizer, OPTIMIZER_NAMES)?;
    check_selection("lr_scheduler", &manifest.train.lr_scheduler, SCHEDULER_NAMES)?;

    Ok(())
}
