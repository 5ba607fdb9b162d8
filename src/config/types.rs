//! Configuration type definitions.

use crate::constants::range_filter::DEFAULT_THRESHOLD;
use crate::constants::server::{DEFAULT_HOST, DEFAULT_PORT};
use crate::constants::uploads::DEFAULT_DIR;
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_MIN_CONFIDENCE, DEFAULT_OVERLAP, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Model used by the analyzer.
    pub model: Option<ModelConfig>,

    /// Analysis settings.
    pub analysis: AnalysisConfig,

    /// Upload staging settings.
    pub uploads: UploadConfig,

    /// Inference settings.
    pub inference: InferenceConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Allow any origin, method and header.
    pub permissive_cors: bool,

    /// Optional request body limit in bytes. Unlimited when unset.
    pub max_upload_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            permissive_cors: true,
            max_upload_bytes: None,
        }
    }
}

/// Configuration for the classification model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: PathBuf,

    /// Path to the labels file.
    pub labels: PathBuf,

    /// Optional meta model used for location filtering.
    #[serde(default)]
    pub meta_model: Option<PathBuf>,
}

/// Analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum confidence threshold.
    pub min_confidence: f32,

    /// Number of top predictions kept per segment.
    pub top_k: usize,

    /// Segment overlap in seconds.
    pub overlap: f32,

    /// Batch size for inference.
    pub batch_size: usize,

    /// Filter species by the request's coordinates and date.
    pub location_filter: bool,

    /// Location score threshold for the range filter.
    pub range_threshold: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            top_k: DEFAULT_TOP_K,
            overlap: DEFAULT_OVERLAP,
            batch_size: DEFAULT_BATCH_SIZE,
            location_filter: false,
            range_threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Upload staging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory where uploads are written before analysis.
    pub dir: PathBuf,

    /// Keep analyzed uploads on disk under their declared filename.
    pub retain: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            retain: false,
        }
    }
}

/// Inference device configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Prefer GPU, warn on CPU fallback.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}
