//! Production analyzer backed by a `BirdNET` ONNX model.

use crate::analysis::{AnalysisRequest, Analyzer};
use crate::audio::{Segment, load_segments};
use crate::config::{AnalysisConfig, InferenceConfig, ModelConfig};
use crate::detection::Detection;
use crate::error::{Error, Result};
use crate::inference::{BirdClassifier, ClassifierSettings};
use crate::utils::date::week_start_of;
use birdnet_onnx::Prediction;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, info};

/// Analyzer that decodes, segments and classifies recordings with `BirdNET`.
pub struct BirdnetAnalyzer {
    // ONNX sessions are not assumed to be shareable across threads.
    classifier: Mutex<BirdClassifier>,
    sample_rate: u32,
    segment_duration: f32,
    overlap: f32,
    batch_size: usize,
}

impl BirdnetAnalyzer {
    /// Load the model and build an analyzer.
    pub fn from_config(
        model: &ModelConfig,
        analysis: &AnalysisConfig,
        inference: &InferenceConfig,
    ) -> Result<Self> {
        let settings = ClassifierSettings {
            device: inference.device,
            min_confidence: analysis.min_confidence,
            top_k: analysis.top_k,
            range_threshold: analysis.range_threshold,
        };
        let classifier = BirdClassifier::from_config(model, settings, analysis.location_filter)?;
        check_overlap(analysis.overlap, classifier.segment_duration())?;

        if classifier.range_filter().is_some() {
            info!(
                "Location filtering enabled (threshold {:.3})",
                analysis.range_threshold
            );
        }

        Ok(Self {
            sample_rate: classifier.sample_rate(),
            segment_duration: classifier.segment_duration(),
            overlap: analysis.overlap,
            batch_size: analysis.batch_size.max(1),
            classifier: Mutex::new(classifier),
        })
    }

    fn classify(
        &self,
        segments: &[Segment],
        request: &AnalysisRequest<'_>,
    ) -> Result<Vec<Detection>> {
        let classifier = self.classifier.lock().map_err(|_| Error::Internal {
            message: "classifier lock poisoned".to_string(),
        })?;

        let location_scores = match (classifier.range_filter(), request.location) {
            (Some(filter), Some(location)) => {
                let (month, day) = week_start_of(&request.date);
                debug!(
                    "Scoring species for lat={:.4}, lon={:.4}, month={month}, day={day}",
                    location.latitude, location.longitude
                );
                Some(filter.predict(location.latitude, location.longitude, month, day)?)
            }
            _ => None,
        };

        let mut detections = Vec::new();
        for batch in segments.chunks(self.batch_size) {
            let inputs: Vec<&[f32]> = batch.iter().map(|s| s.samples.as_slice()).collect();
            let mut results = classifier.predict_batch(&inputs)?;

            if let (Some(filter), Some(scores)) = (classifier.range_filter(), &location_scores) {
                for result in &mut results {
                    result.predictions = filter.filter_predictions(&result.predictions, scores);
                }
            }

            for (segment, result) in batch.iter().zip(&results) {
                collect_detections(
                    segment,
                    &result.predictions,
                    request.min_confidence,
                    &mut detections,
                );
            }
        }

        Ok(detections)
    }
}

impl Analyzer for BirdnetAnalyzer {
    fn name(&self) -> &str {
        "birdnet"
    }

    fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Vec<Detection>> {
        let start = Instant::now();

        let segments = load_segments(
            request.path,
            self.sample_rate,
            self.segment_duration,
            self.overlap,
        )?;
        if segments.is_empty() {
            info!("No segments to analyze in {}", request.path.display());
            return Ok(Vec::new());
        }

        let detections = self.classify(&segments, request)?;

        info!(
            "Analyzed {} segment(s) of {} in {:.2}s, {} detection(s) above {:.0}% confidence",
            segments.len(),
            request.path.display(),
            start.elapsed().as_secs_f64(),
            detections.len(),
            request.min_confidence * 100.0
        );

        Ok(detections)
    }
}

/// Overlap must leave a positive step between segments.
fn check_overlap(overlap: f32, segment_duration: f32) -> Result<()> {
    if overlap >= segment_duration {
        return Err(Error::ConfigValidation {
            message: format!(
                "overlap must be less than the model segment duration ({segment_duration}s), got {overlap}"
            ),
        });
    }
    Ok(())
}

fn collect_detections(
    segment: &Segment,
    predictions: &[Prediction],
    min_confidence: f32,
    out: &mut Vec<Detection>,
) {
    out.extend(
        predictions
            .iter()
            .filter(|p| p.confidence >= min_confidence)
            .map(|p| {
                Detection::from_label(
                    &p.species,
                    p.confidence,
                    segment.start_time,
                    segment.end_time,
                )
            }),
    );
}
