//! Inference module for bird species detection.

mod classifier;
pub mod range_filter;

pub use classifier::{BirdClassifier, ClassifierSettings};

use crate::error::{Error, Result};

/// Initialize the ONNX runtime. Must run once before any classifier is built.
pub fn init_runtime() -> Result<()> {
    birdnet_onnx::init_runtime().map_err(|e| Error::RuntimeInitialization {
        reason: e.to_string(),
    })
}
