//! Audio resampling using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Input block size fed to the FFT resampler.
const CHUNK_SIZE: usize = 1024;

/// Resample mono audio to the target sample rate.
///
/// Returns the input unchanged if already at the target rate.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples);
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        1,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let block = resampler.input_frames_next();
    let delay = resampler.output_delay();
    let expected_len = scaled_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(delay + expected_len + CHUNK_SIZE);

    let mut blocks = samples.chunks_exact(block);
    for chunk in blocks.by_ref() {
        output.extend(process_block(&mut resampler, chunk)?);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut padded = tail.to_vec();
        padded.resize(block, 0.0);
        output.extend(process_block(&mut resampler, &padded)?);
    }

    // Flush the filter delay with silence, then drop the leading delay so
    // output frame 0 lines up with input frame 0.
    let silence = vec![0.0; block];
    while output.len() < delay + expected_len {
        let flushed = process_block(&mut resampler, &silence)?;
        if flushed.is_empty() {
            break;
        }
        output.extend(flushed);
    }
    output.drain(..delay.min(output.len()));
    output.truncate(expected_len);

    Ok(output)
}

/// Run one fixed-size block through the resampler.
fn process_block(resampler: &mut Fft<f32>, block: &[f32]) -> Result<Vec<f32>> {
    let input = SequentialSlice::new(block, 1, block.len()).map_err(|e| Error::Resample {
        reason: format!("failed to create input adapter: {e}"),
    })?;

    resampler
        .process(&input, 0, None)
        .map(|resampled| resampled.take_data())
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })
}

/// Number of output frames corresponding to `input_len` input frames.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_same_rate_returns_input() {
        let samples = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let result = resample(samples.clone(), 48000, 48000).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn test_resample_44100_to_48000() {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f32> = (0..44_100).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample(samples, 44_100, 48_000).unwrap();
        assert_eq!(output.len(), 48_000);
    }

    #[test]
    fn test_resample_downsample_short_input() {
        let samples = vec![0.0; 300];
        let output = resample(samples, 48_000, 32_000).unwrap();
        assert_eq!(output.len(), 200);
    }

    #[test]
    fn test_resample_output_is_aligned_with_input() {
        let mut samples = vec![0.0; 44_100];
        samples[4_410] = 1.0;

        let output = resample(samples, 44_100, 48_000).unwrap();
        assert_eq!(output.len(), 48_000);

        let peak = output
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        // 0.1 s in: sample 4410 at 44.1 kHz is sample 4800 at 48 kHz.
        assert!(peak.abs_diff(4_800) <= 3, "peak at {peak}");
    }

    #[test]
    fn test_scaled_len() {
        assert_eq!(scaled_len(48_000, 48_000, 32_000), 32_000);
        assert_eq!(scaled_len(1, 2, 3), 2);
    }
}
