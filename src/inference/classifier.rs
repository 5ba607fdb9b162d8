//! Inference classifier wrapper around birdnet-onnx.

use crate::config::{InferenceDevice, ModelConfig};
use crate::error::{Error, Result};
use crate::inference::range_filter::RangeFilter;
use birdnet_onnx::{
    Classifier, ClassifierBuilder, ExecutionProviderInfo, InferenceOptions, PredictionResult,
    available_execution_providers, ort_execution_providers,
};
use tracing::{debug, info, warn};

/// GPU providers tried by `auto` and `gpu`, best first.
const GPU_PRIORITY: [(ExecutionProviderInfo, &str); 6] = [
    (ExecutionProviderInfo::TensorRt, "TensorRT"),
    (ExecutionProviderInfo::Cuda, "CUDA"),
    (ExecutionProviderInfo::DirectMl, "DirectML"),
    (ExecutionProviderInfo::CoreMl, "CoreML"),
    (ExecutionProviderInfo::Rocm, "ROCm"),
    (ExecutionProviderInfo::OpenVino, "OpenVINO"),
];

/// Settings used to build a [`BirdClassifier`].
#[derive(Debug, Clone, Copy)]
pub struct ClassifierSettings {
    /// Device selection.
    pub device: InferenceDevice,
    /// Minimum confidence applied inside the model wrapper.
    pub min_confidence: f32,
    /// Number of top predictions per segment.
    pub top_k: usize,
    /// Location score threshold, used when a meta model is configured.
    pub range_threshold: f32,
}

/// Wrapper around birdnet-onnx Classifier with piopio configuration.
pub struct BirdClassifier {
    inner: Classifier,
    range_filter: Option<RangeFilter>,
}

impl BirdClassifier {
    /// Build a classifier from the model configuration.
    ///
    /// The range filter is only loaded when `with_range_filter` is set and the
    /// model has a meta model.
    pub fn from_config(
        model: &ModelConfig,
        settings: ClassifierSettings,
        with_range_filter: bool,
    ) -> Result<Self> {
        let available = available_execution_providers();
        debug!(
            "Available execution providers: {}",
            available
                .iter()
                .map(|p| format!("{p:?}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let builder = ClassifierBuilder::new()
            .model_path(model.path.to_string_lossy().to_string())
            .labels_path(model.labels.to_string_lossy().to_string())
            .top_k(settings.top_k)
            .min_confidence(settings.min_confidence);

        let best_gpu = GPU_PRIORITY.iter().find(|(p, _)| available.contains(p));
        let (builder, device_name) = match (settings.device, best_gpu) {
            (InferenceDevice::Cpu, _) => (builder, "CPU"),
            (InferenceDevice::Auto | InferenceDevice::Gpu, Some(&(provider, name))) => {
                info!("Selected {name} execution provider");
                (add_execution_provider(builder, provider), name)
            }
            (InferenceDevice::Auto, None) => {
                info!("No GPU providers available, using CPU");
                (builder, "Auto (CPU)")
            }
            (InferenceDevice::Gpu, None) => {
                warn!("GPU requested but no GPU providers available, using CPU");
                (builder, "GPU (fallback to CPU)")
            }
        };

        let inner = builder.build().map_err(|e| Error::ClassifierBuild {
            reason: e.to_string(),
        })?;

        info!(
            "Loaded model: {:?}, sample_rate: {}, segment_duration: {}s, device: {}",
            inner.config().model_type,
            inner.config().sample_rate,
            inner.config().segment_duration,
            device_name
        );

        let range_filter = match (&model.meta_model, with_range_filter) {
            (Some(meta_path), true) => Some(RangeFilter::from_config(
                meta_path,
                inner.labels(),
                settings.range_threshold,
            )?),
            _ => None,
        };

        Ok(Self {
            inner,
            range_filter,
        })
    }

    /// Get the expected sample rate for this model.
    pub fn sample_rate(&self) -> u32 {
        self.inner.config().sample_rate
    }

    /// Get the expected segment duration in seconds.
    pub fn segment_duration(&self) -> f32 {
        self.inner.config().segment_duration
    }

    /// Run inference on a batch of audio segments.
    pub fn predict_batch(&self, segments: &[&[f32]]) -> Result<Vec<PredictionResult>> {
        let options = InferenceOptions::default();
        let results = if let [segment] = segments {
            self.inner.predict(segment, &options).map(|r| vec![r])
        } else {
            self.inner.predict_batch(segments, &options)
        };

        results.map_err(|e| Error::Inference {
            reason: e.to_string(),
        })
    }

    /// Get the optional range filter.
    pub const fn range_filter(&self) -> Option<&RangeFilter> {
        self.range_filter.as_ref()
    }
}

/// Helper function to add execution provider to builder based on provider type.
fn add_execution_provider(
    builder: ClassifierBuilder,
    provider_info: ExecutionProviderInfo,
) -> ClassifierBuilder {
    use ort_execution_providers::{
        CUDAExecutionProvider, CoreMLExecutionProvider, DirectMLExecutionProvider,
        OpenVINOExecutionProvider, ROCmExecutionProvider,
    };

    match provider_info {
        ExecutionProviderInfo::Cuda => builder.execution_provider(CUDAExecutionProvider::default()),
        ExecutionProviderInfo::TensorRt => builder.with_tensorrt(),
        ExecutionProviderInfo::DirectMl => {
            builder.execution_provider(DirectMLExecutionProvider::default())
        }
        ExecutionProviderInfo::CoreMl => {
            builder.execution_provider(CoreMLExecutionProvider::default())
        }
        ExecutionProviderInfo::Rocm => builder.execution_provider(ROCmExecutionProvider::default()),
        ExecutionProviderInfo::OpenVino => {
            builder.execution_provider(OpenVINOExecutionProvider::default())
        }
        _ => builder,
    }
}
