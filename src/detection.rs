//! Detection and location types shared by the analyzer and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single species detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Scientific name of the species.
    pub scientific_name: String,
    /// Common name of the species.
    pub common_name: String,
    /// Detection confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Segment start time in seconds.
    pub start_time: f32,
    /// Segment end time in seconds.
    pub end_time: f32,
}

impl Detection {
    /// Parse species label in `BirdNET` format.
    ///
    /// `BirdNET` labels are formatted as `ScientificName_CommonName`.
    pub fn from_label(label: &str, confidence: f32, start_time: f32, end_time: f32) -> Self {
        let (scientific_name, common_name) = label
            .split_once('_')
            .map_or((label, label), |(scientific, common)| (scientific, common));

        Self {
            scientific_name: scientific_name.to_string(),
            common_name: common_name.to_string(),
            confidence,
            start_time,
            end_time,
        }
    }

    /// Ordering used for detection lists: earliest segment first, then the
    /// most confident detection within a segment.
    pub fn ranking(a: &Self, b: &Self) -> Ordering {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// Coordinates attached to an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTag {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoTag {
    /// Create a tag from raw coordinates. Values are not validated.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The coordinates as a `(lat, lon)` pair.
    pub const fn as_pair(self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Outcome of an analysis narrowed to its top-ranked detection.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// The classifier returned nothing above the threshold.
    NoDetection,
    /// The first detection in ranking order.
    Detected(Detection),
}

impl DetectionOutcome {
    /// Take the first detection of an already ranked list.
    pub fn from_ranked(detections: &[Detection]) -> Self {
        detections
            .first()
            .cloned()
            .map_or(Self::NoDetection, Self::Detected)
    }

    /// The detection, if any.
    pub const fn detection(&self) -> Option<&Detection> {
        match self {
            Self::NoDetection => None,
            Self::Detected(detection) => Some(detection),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_from_label() {
        let detection = Detection::from_label("Passer domesticus_House Sparrow", 0.95, 0.0, 3.0);
        assert_eq!(detection.scientific_name, "Passer domesticus");
        assert_eq!(detection.common_name, "House Sparrow");
        assert_eq!(detection.confidence, 0.95);
    }

    #[test]
    fn test_detection_from_label_no_underscore() {
        let detection = Detection::from_label("Unknown Species", 0.5, 0.0, 3.0);
        assert_eq!(detection.scientific_name, "Unknown Species");
        assert_eq!(detection.common_name, "Unknown Species");
    }

    #[test]
    fn test_ranking_orders_by_time_then_confidence() {
        let mut detections = vec![
            Detection::from_label("Turdus merula_Blackbird", 0.9, 3.0, 6.0),
            Detection::from_label("Parus major_Great Tit", 0.4, 0.0, 3.0),
            Detection::from_label("Branta canadensis_Canada Goose", 0.8, 0.0, 3.0),
        ];
        detections.sort_by(Detection::ranking);

        let names: Vec<_> = detections
            .iter()
            .map(|d| d.scientific_name.as_str())
            .collect();
        assert_eq!(names, ["Branta canadensis", "Parus major", "Turdus merula"]);
    }

    #[test]
    fn test_outcome_from_empty_list() {
        assert_eq!(DetectionOutcome::from_ranked(&[]), DetectionOutcome::NoDetection);
        assert!(DetectionOutcome::NoDetection.detection().is_none());
    }

    #[test]
    fn test_outcome_takes_first() {
        let detections = vec![
            Detection::from_label("Branta canadensis_Canada Goose", 0.8, 0.0, 3.0),
            Detection::from_label("Parus major_Great Tit", 0.9, 3.0, 6.0),
        ];
        let outcome = DetectionOutcome::from_ranked(&detections);
        assert_eq!(
            outcome.detection().map(|d| d.scientific_name.as_str()),
            Some("Branta canadensis")
        );
    }
}
