//! Location-based species filtering with the birdnet-onnx meta model.

use crate::error::{Error, Result};
use birdnet_onnx::{LocationScore, Prediction, RangeFilter as BirdnetRangeFilter};
use std::path::Path;

/// Wrapper around birdnet-onnx `RangeFilter`.
pub struct RangeFilter {
    inner: BirdnetRangeFilter,
}

impl RangeFilter {
    /// Build a range filter aligned with the classifier's labels.
    pub fn from_config(
        meta_model_path: &Path,
        classifier_labels: &[String],
        threshold: f32,
    ) -> Result<Self> {
        let inner = BirdnetRangeFilter::builder()
            .model_path(meta_model_path.to_string_lossy().to_string())
            .from_classifier_labels(classifier_labels)
            .threshold(threshold)
            .build()
            .map_err(|e| Error::RangeFilterBuild {
                reason: e.to_string(),
            })?;

        Ok(Self { inner })
    }

    /// Location scores for every species at the given coordinates and date.
    pub fn predict(
        &self,
        latitude: f64,
        longitude: f64,
        month: u32,
        day: u32,
    ) -> Result<Vec<LocationScore>> {
        #[allow(clippy::cast_possible_truncation)]
        self.inner
            .predict(latitude as f32, longitude as f32, month, day)
            .map_err(|e| Error::RangeFilterPredict {
                reason: e.to_string(),
            })
    }

    /// Drop predictions for species not expected at the scored location.
    pub fn filter_predictions(
        &self,
        predictions: &[Prediction],
        location_scores: &[LocationScore],
    ) -> Vec<Prediction> {
        self.inner
            .filter_predictions(predictions, location_scores, false)
    }
}
