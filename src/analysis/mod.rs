//! Analysis of a single recording.
//!
//! An [`Analyzer`] turns an audio file into species detections. A
//! [`Recording`] binds one file to an analyzer together with the request
//! timestamp and confidence floor, runs the analysis once and keeps the
//! ranked detections.

mod birdnet;

pub use birdnet::BirdnetAnalyzer;

use crate::detection::{Detection, DetectionOutcome, GeoTag};
use crate::error::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parameters for one analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    /// Audio file to analyze.
    pub path: &'a Path,
    /// Time the recording was submitted.
    pub date: DateTime<Local>,
    /// Detections below this confidence are discarded.
    pub min_confidence: f32,
    /// Where the recording was made, if known.
    pub location: Option<GeoTag>,
}

/// Species classifier over audio files.
///
/// Implementations are shared across requests and must tolerate concurrent
/// calls to [`Analyzer::analyze`].
pub trait Analyzer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Detect species in the requested file.
    fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Vec<Detection>>;
}

/// An audio file bound to an analyzer.
pub struct Recording<'a> {
    analyzer: &'a dyn Analyzer,
    path: PathBuf,
    date: DateTime<Local>,
    min_confidence: f32,
    location: Option<GeoTag>,
    detections: Vec<Detection>,
}

impl<'a> Recording<'a> {
    /// Bind `path` to `analyzer`.
    pub fn new(
        analyzer: &'a dyn Analyzer,
        path: impl Into<PathBuf>,
        date: DateTime<Local>,
        min_confidence: f32,
    ) -> Self {
        Self {
            analyzer,
            path: path.into(),
            date,
            min_confidence,
            location: None,
            detections: Vec::new(),
        }
    }

    /// Attach recording coordinates.
    #[must_use]
    pub fn with_location(mut self, location: GeoTag) -> Self {
        self.location = Some(location);
        self
    }

    /// Run the analyzer and store detections at or above the threshold,
    /// ranked with [`Detection::ranking`].
    pub fn analyze(&mut self) -> Result<&[Detection]> {
        let request = AnalysisRequest {
            path: &self.path,
            date: self.date,
            min_confidence: self.min_confidence,
            location: self.location,
        };

        let mut detections = self.analyzer.analyze(&request)?;
        detections.retain(|d| d.confidence >= self.min_confidence);
        detections.sort_by(Detection::ranking);

        debug!(
            "{} found {} detection(s) in {}",
            self.analyzer.name(),
            detections.len(),
            self.path.display()
        );

        self.detections = detections;
        Ok(&self.detections)
    }

    /// Detections from the last [`Recording::analyze`] call.
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// The top-ranked detection, if any.
    pub fn top_detection(&self) -> DetectionOutcome {
        DetectionOutcome::from_ranked(&self.detections)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedAnalyzer {
        detections: Vec<Detection>,
        seen: Mutex<Vec<(PathBuf, f32, Option<GeoTag>)>>,
    }

    impl Analyzer for CannedAnalyzer {
        fn name(&self) -> &str {
            "canned"
        }

        fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Vec<Detection>> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((
                    request.path.to_path_buf(),
                    request.min_confidence,
                    request.location,
                ));
            }
            Ok(self.detections.clone())
        }
    }

    fn canned(detections: Vec<Detection>) -> CannedAnalyzer {
        CannedAnalyzer {
            detections,
            seen: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_recording_passes_request_fields() {
        let analyzer = canned(Vec::new());
        let mut recording = Recording::new(&analyzer, "goose.mp3", Local::now(), 0.25)
            .with_location(GeoTag::new(12.0, 24.0));
        recording.analyze().unwrap();

        let seen = analyzer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, PathBuf::from("goose.mp3"));
        assert_eq!(seen[0].1, 0.25);
        assert_eq!(seen[0].2, Some(GeoTag::new(12.0, 24.0)));
    }

    #[test]
    fn test_recording_drops_low_confidence_and_ranks() {
        let analyzer = canned(vec![
            Detection::from_label("Turdus merula_Blackbird", 0.9, 3.0, 6.0),
            Detection::from_label("Parus major_Great Tit", 0.1, 0.0, 3.0),
            Detection::from_label("Branta canadensis_Canada Goose", 0.6, 0.0, 3.0),
        ]);
        let mut recording = Recording::new(&analyzer, "a.wav", Local::now(), 0.25);
        let detections = recording.analyze().unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].scientific_name, "Branta canadensis");
        assert!(detections.iter().all(|d| d.confidence >= 0.25));
    }

    #[test]
    fn test_recording_threshold_is_inclusive() {
        let analyzer = canned(vec![Detection::from_label("Anser anser_Greylag Goose", 0.25, 0.0, 3.0)]);
        let mut recording = Recording::new(&analyzer, "a.wav", Local::now(), 0.25);
        recording.analyze().unwrap();
        assert_eq!(recording.detections().len(), 1);
    }

    #[test]
    fn test_top_detection_without_detections() {
        let analyzer = canned(Vec::new());
        let mut recording = Recording::new(&analyzer, "a.wav", Local::now(), 0.25);
        recording.analyze().unwrap();
        assert_eq!(recording.top_detection(), DetectionOutcome::NoDetection);
    }
}
