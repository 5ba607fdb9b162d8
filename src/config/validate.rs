//! Configuration validation.

use crate::config::{Config, ModelConfig};
use crate::constants::{MAX_BATCH_SIZE, confidence};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_analysis(config)?;
    validate_location_filter(config)?;
    Ok(())
}

/// Validate analysis settings.
fn validate_analysis(config: &Config) -> Result<()> {
    let analysis = &config.analysis;

    if !(confidence::MIN..=confidence::MAX).contains(&analysis.min_confidence) {
        return Err(Error::ConfigValidation {
            message: format!(
                "min_confidence must be between {} and {}, got {}",
                confidence::MIN,
                confidence::MAX,
                analysis.min_confidence
            ),
        });
    }

    if analysis.overlap < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("overlap must be non-negative, got {}", analysis.overlap),
        });
    }

    if analysis.batch_size == 0 || analysis.batch_size > MAX_BATCH_SIZE {
        return Err(Error::ConfigValidation {
            message: format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                analysis.batch_size
            ),
        });
    }

    if analysis.top_k == 0 {
        return Err(Error::ConfigValidation {
            message: "top_k must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate a model configuration and check files exist.
pub fn validate_model_config(model: &ModelConfig) -> Result<()> {
    if !model.path.exists() {
        return Err(Error::ModelFileNotFound {
            path: model.path.clone(),
        });
    }

    if !model.labels.exists() {
        return Err(Error::LabelsFileNotFound {
            path: model.labels.clone(),
        });
    }

    if let Some(meta_path) = &model.meta_model
        && !meta_path.exists()
    {
        return Err(Error::MetaModelNotFound {
            path: meta_path.clone(),
        });
    }

    Ok(())
}

/// Location filtering needs a meta model to score species by coordinates.
fn validate_location_filter(config: &Config) -> Result<()> {
    if !config.analysis.location_filter {
        return Ok(());
    }

    let has_meta_model = config
        .model
        .as_ref()
        .is_some_and(|model| model.meta_model.is_some());
    if !has_meta_model {
        return Err(Error::MetaModelMissing);
    }

    Ok(())
}
