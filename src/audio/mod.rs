//! Audio decoding, resampling and segmentation.

mod chunker;
mod decode;
mod resample;

pub use chunker::{Segment, segment_audio};
pub use decode::{DecodedAudio, decode_audio_file};
pub use resample::resample;

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Decode a recording and split it into model-ready segments.
///
/// The audio is mixed to mono and resampled to `sample_rate` first.
pub fn load_segments(
    path: &Path,
    sample_rate: u32,
    segment_duration: f32,
    overlap: f32,
) -> Result<Vec<Segment>> {
    let decoded = decode_audio_file(path)?;
    debug!(
        "Decoded {} ({:.1}s at {} Hz)",
        path.display(),
        decoded.duration_secs,
        decoded.sample_rate
    );

    let samples = if decoded.sample_rate == sample_rate {
        decoded.samples
    } else {
        debug!(
            "Resampling from {} Hz to {} Hz",
            decoded.sample_rate, sample_rate
        );
        resample(decoded.samples, decoded.sample_rate, sample_rate)?
    };

    Ok(segment_audio(&samples, sample_rate, segment_duration, overlap))
}
