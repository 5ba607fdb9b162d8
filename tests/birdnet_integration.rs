//! Integration tests for the `BirdNET` analyzer.
//!
//! Note: These tests require actual model files to run.
//! They will be skipped if model environment variables are not set.

#![allow(clippy::unwrap_used)]

use chrono::Local;
use piopio::analysis::{BirdnetAnalyzer, Recording};
use piopio::config::{AnalysisConfig, InferenceConfig, InferenceDevice, ModelConfig};
use piopio::detection::{DetectionOutcome, GeoTag};
use std::path::{Path, PathBuf};

fn test_model() -> Option<ModelConfig> {
    let model = std::env::var("PIOPIO_TEST_MODEL").ok()?;
    let labels = std::env::var("PIOPIO_TEST_LABELS").ok()?;
    Some(ModelConfig {
        path: PathBuf::from(model),
        labels: PathBuf::from(labels),
        meta_model: std::env::var("PIOPIO_TEST_META_MODEL").ok().map(PathBuf::from),
    })
}

fn silent_wav(path: &Path, seconds: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..spec.sample_rate * seconds {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn cpu_inference() -> InferenceConfig {
    InferenceConfig {
        device: InferenceDevice::Cpu,
    }
}

#[test]
fn test_silence_yields_no_detection() {
    let Some(model) = test_model() else {
        eprintln!("Skipping integration test - model files not configured");
        eprintln!("Set PIOPIO_TEST_MODEL and PIOPIO_TEST_LABELS to run");
        return;
    };

    piopio::inference::init_runtime().unwrap();
    let analyzer =
        BirdnetAnalyzer::from_config(&model, &AnalysisConfig::default(), &cpu_inference())
            .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let wav = dir.path().join("silence.wav");
    silent_wav(&wav, 6);

    let mut recording = Recording::new(&analyzer, &wav, Local::now(), 0.25);
    recording.analyze().unwrap();

    assert_eq!(recording.top_detection(), DetectionOutcome::NoDetection);
}

#[test]
fn test_location_filter_runs_with_meta_model() {
    let Some(model) = test_model().filter(|m| m.meta_model.is_some()) else {
        eprintln!("Skipping integration test - meta model not configured");
        eprintln!("Set PIOPIO_TEST_META_MODEL to run");
        return;
    };

    piopio::inference::init_runtime().unwrap();
    let analysis = AnalysisConfig {
        location_filter: true,
        ..AnalysisConfig::default()
    };
    let analyzer = BirdnetAnalyzer::from_config(&model, &analysis, &cpu_inference()).unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let wav = dir.path().join("silence.wav");
    silent_wav(&wav, 3);

    let mut recording = Recording::new(&analyzer, &wav, Local::now(), 0.25)
        .with_location(GeoTag::new(60.17, 24.94));
    let detections = recording.analyze().unwrap();

    assert!(detections.iter().all(|d| d.confidence >= 0.25));
}

#[test]
fn test_non_audio_file_is_rejected() {
    let Some(model) = test_model() else {
        eprintln!("Skipping integration test - model files not configured");
        return;
    };

    piopio::inference::init_runtime().unwrap();
    let analyzer =
        BirdnetAnalyzer::from_config(&model, &AnalysisConfig::default(), &cpu_inference())
            .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let bogus = dir.path().join("notes.mp3");
    std::fs::write(&bogus, b"not an mp3 at all").unwrap();

    let mut recording = Recording::new(&analyzer, &bogus, Local::now(), 0.25);
    assert!(recording.analyze().is_err());
}
