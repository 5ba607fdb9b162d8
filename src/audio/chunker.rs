//! Splitting audio into fixed-length model segments.

/// A model-sized slice of a recording with its time offset.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Audio samples, zero-padded to the full segment length.
    pub samples: Vec<f32>,
    /// Start time in seconds.
    pub start_time: f32,
    /// End time in seconds.
    pub end_time: f32,
}

/// Split samples into segments of `segment_duration` seconds, advancing by
/// `segment_duration - overlap` each step.
///
/// The final segment is zero-padded. Returns no segments if the step would be
/// zero or the input is empty.
pub fn segment_audio(
    samples: &[f32],
    sample_rate: u32,
    segment_duration: f32,
    overlap: f32,
) -> Vec<Segment> {
    let segment_len = seconds_to_samples(segment_duration, sample_rate);
    let step = segment_len.saturating_sub(seconds_to_samples(overlap, sample_rate));
    if step == 0 || samples.is_empty() {
        return Vec::new();
    }

    (0..samples.len())
        .step_by(step)
        .map(|pos| {
            let end = (pos + segment_len).min(samples.len());
            let mut data = samples[pos..end].to_vec();
            data.resize(segment_len, 0.0);

            #[allow(clippy::cast_precision_loss)]
            let start_time = pos as f32 / sample_rate as f32;

            Segment {
                samples: data,
                start_time,
                end_time: start_time + segment_duration,
            }
        })
        .collect()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn seconds_to_samples(seconds: f32, sample_rate: u32) -> usize {
    (seconds * sample_rate as f32) as usize
}
