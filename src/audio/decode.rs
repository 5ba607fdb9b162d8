//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decoded audio data.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Audio samples as mono f32 in range [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration_secs: f32,
}

/// Decode an audio file to mono f32 samples.
///
/// The container is probed from its content, with the file extension used as
/// a hint. Supports WAV, FLAC, MP3 and AAC.
pub fn decode_audio_file(path: &Path) -> Result<DecodedAudio> {
    let open_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::AudioOpen {
        path: path.to_path_buf(),
        source,
    };
    let decode_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::AudioDecode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| open_err(Box::new(e)))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| open_err(Box::new(e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| decode_err("missing sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(Box::new(e)))?;

    let mut samples = Vec::new();
    let mut sample_buf: Option<(SampleBuffer<f32>, SignalSpec, usize)> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_err(Box::new(e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt frames are skipped, matching how most players behave.
            Err(SymphoniaError::DecodeError(reason)) => {
                debug!("Skipping undecodable packet: {reason}");
                skipped_packets += 1;
                continue;
            }
            Err(e) => return Err(decode_err(Box::new(e))),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let capacity = decoded.capacity() as u64;

        let stale = sample_buf
            .as_ref()
            .is_none_or(|(_, buf_spec, frames)| *buf_spec != spec || *frames < decoded.capacity());
        if stale {
            sample_buf = Some((
                SampleBuffer::<f32>::new(capacity, spec),
                spec,
                decoded.capacity(),
            ));
        }
        let Some((buf, _, _)) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);
        mix_to_mono(buf.samples(), channels, &mut samples);
    }

    if skipped_packets > 0 {
        warn!(
            "Skipped {} undecodable packet(s) in {}",
            skipped_packets,
            path.display()
        );
    }

    if samples.is_empty() {
        return Err(decode_err("no decodable audio frames".into()));
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = samples.len() as f32 / sample_rate as f32;

    Ok(DecodedAudio {
        samples,
        sample_rate,
        duration_secs,
    })
}

/// Append interleaved frames to `output`, averaging channels into one.
fn mix_to_mono(interleaved: &[f32], channels: usize, output: &mut Vec<f32>) {
    if channels == 1 {
        output.extend_from_slice(interleaved);
        return;
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / channels as f32;
    output.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mix_to_mono_averages_channels() {
        let mut out = Vec::new();
        mix_to_mono(&[0.5, -0.5, 1.0, 0.0], 2, &mut out);
        assert_eq!(out, vec![0.0, 0.5]);
    }

    #[test]
    fn test_mix_to_mono_passes_mono_through() {
        let mut out = vec![0.1];
        mix_to_mono(&[0.2, 0.3], 1, &mut out);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_decode_rejects_non_audio() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        writeln!(file, "definitely not an mp3 stream").unwrap();

        let result = decode_audio_file(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_audio_file(Path::new("/nonexistent/recording.wav"));
        assert!(matches!(result, Err(Error::AudioOpen { .. })));
    }
}
