//! JSON response bodies and error mapping.

use crate::detection::{Detection, DetectionOutcome, GeoTag};
use crate::error::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Fixed liveness message.
    pub message: String,
}

/// Body of `POST /analyze/`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    /// Filename declared by the client.
    pub filename: String,
    /// Scientific name of the top detection; `null` when nothing was detected.
    pub scientific_name: Option<String>,
    /// Coordinates exactly as received.
    pub latlon: (f64, f64),
}

impl AnalyzeResponse {
    /// Shape an analysis outcome for the client.
    pub fn new(filename: String, outcome: DetectionOutcome, location: GeoTag) -> Self {
        let scientific_name = match outcome {
            DetectionOutcome::Detected(detection) => Some(detection.scientific_name),
            DetectionOutcome::NoDetection => None,
        };

        Self {
            filename,
            scientific_name,
            latlon: location.as_pair(),
        }
    }
}

/// Body of `POST /identificarAve`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct IdentifyResponse {
    /// Common name of the species.
    pub common_name: String,
    /// Scientific name of the species.
    pub scientific_name: String,
    /// Detection confidence.
    pub confidence: f32,
}

impl From<Detection> for IdentifyResponse {
    fn from(detection: Detection) -> Self {
        Self {
            common_name: detection.common_name,
            scientific_name: detection.scientific_name,
            confidence: detection.confidence,
        }
    }
}

impl Error {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ClassificationUnavailable => StatusCode::NOT_IMPLEMENTED,
            _ if self.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = error_chain(&self);

        if status.is_server_error() {
            error!("Request failed ({status}): {message}");
        } else {
            warn!("Rejected request ({status}): {message}");
        }

        (
            status,
            Json(json!({
                "error": message,
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

/// Error message followed by its sources, joined with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_response_serializes_latlon_as_array() {
        let detection = Detection::from_label("Branta canadensis_Canada Goose", 0.9, 0.0, 3.0);
        let response = AnalyzeResponse::new(
            "goose.mp3".to_string(),
            DetectionOutcome::Detected(detection),
            GeoTag::new(12.0, 24.0),
        );

        let value = serde_json::to_value(&response).unwrap_or_default();
        assert_eq!(
            value,
            json!({
                "filename": "goose.mp3",
                "scientific_name": "Branta canadensis",
                "latlon": [12.0, 24.0],
            })
        );
    }

    #[test]
    fn test_analyze_response_without_detection() {
        let response = AnalyzeResponse::new(
            "silence.wav".to_string(),
            DetectionOutcome::NoDetection,
            GeoTag::new(-33.45, -70.66),
        );
        assert!(response.scientific_name.is_none());
        assert_eq!(response.latlon, (-33.45, -70.66));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::MissingField { field: "lat" }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::UploadTooLarge {
                reason: "length limit exceeded".to_string()
            }
            .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            Error::ClassificationUnavailable.status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            Error::Inference {
                reason: "session failed".to_string()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_chain_includes_source() {
        let err = Error::AudioDecode {
            path: "x.mp3".into(),
            source: "bad frame header".into(),
        };
        let message = error_chain(&err);
        assert!(message.starts_with("failed to decode audio from 'x.mp3'"));
        assert!(message.ends_with("bad frame header"));
    }
}
