//! Request handlers.

use crate::analysis::Recording;
use crate::constants::server::HEALTH_MESSAGE;
use crate::constants::uploads::IDENTIFY_SUFFIX;
use crate::detection::{Detection, DetectionOutcome, GeoTag};
use crate::error::{Error, Result};
use crate::server::response::{AnalyzeResponse, HealthResponse, IdentifyResponse};
use crate::server::state::AppState;
use crate::server::upload::{read_analyze_form, read_identify_form};
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use chrono::Local;
use tracing::{info, warn};

/// `GET /` - liveness probe.
pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}

/// `POST /analyze/` - classify an uploaded sample and echo its coordinates.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let mut multipart = multipart.map_err(|e| Error::MalformedUpload {
        reason: e.body_text(),
    })?;
    let form = read_analyze_form(&mut multipart).await?;
    let location = GeoTag::new(form.lat, form.lon);
    let filename = form.audio.filename.clone();

    info!(
        "Analyzing '{}' ({} bytes) at lat={}, lon={}",
        filename,
        form.audio.bytes.len(),
        form.lat,
        form.lon
    );

    let analyzer = state.analyzer();
    let uploads = state.uploads();
    let min_confidence = state.min_confidence();

    let outcome = tokio::task::spawn_blocking(move || -> Result<DetectionOutcome> {
        let staged = uploads.stage(&form.audio, None)?;

        let mut recording =
            Recording::new(analyzer.as_ref(), staged.path(), Local::now(), min_confidence)
                .with_location(location);
        recording.analyze()?;
        let outcome = recording.top_detection();

        uploads.finish(staged)?;
        Ok(outcome)
    })
    .await
    .map_err(|e| Error::Internal {
        message: format!("analysis task failed: {e}"),
    })??;

    match outcome.detection() {
        Some(detection) => info!(
            "Top detection for '{}': {} ({:.1}%)",
            filename,
            detection.scientific_name,
            detection.confidence * 100.0
        ),
        None => info!("No detection above threshold for '{}'", filename),
    }

    Ok(Json(AnalyzeResponse::new(filename, outcome, location)))
}

/// `POST /identificarAve` - identification skeleton.
///
/// The upload is staged to a temporary `.wav` file that is always removed,
/// but no classifier is called, so the request fails with `501`.
pub async fn identify(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<IdentifyResponse>> {
    let mut multipart = multipart.map_err(|e| Error::MalformedUpload {
        reason: e.body_text(),
    })?;
    let upload = read_identify_form(&mut multipart).await?;
    let uploads = state.uploads();

    let result = tokio::task::spawn_blocking(move || -> Result<Option<Detection>> {
        let _staged = uploads.stage(&upload, Some(IDENTIFY_SUFFIX))?;
        // TODO: run the staged file through the shared analyzer and look up
        // species images once the identify response contract is settled.
        Ok(None)
    })
    .await
    .map_err(|e| Error::Internal {
        message: format!("identify task failed: {e}"),
    })??;

    let detection = result.ok_or_else(|| {
        warn!("Identify endpoint called but classification is not wired in");
        Error::ClassificationUnavailable
    })?;

    Ok(Json(IdentifyResponse::from(detection)))
}
