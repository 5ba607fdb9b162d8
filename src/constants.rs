//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "piopio";

/// Default minimum confidence threshold for detections.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.25;

/// Default segment overlap in seconds.
pub const DEFAULT_OVERLAP: f32 = 0.0;

/// Default batch size for inference.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Maximum allowed batch size to prevent GPU memory exhaustion.
pub const MAX_BATCH_SIZE: usize = 512;

/// Default number of top predictions to return per segment.
pub const DEFAULT_TOP_K: usize = 5;

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// HTTP server defaults and fixed response values.
pub mod server {
    /// Default bind host.
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Default bind port.
    pub const DEFAULT_PORT: u16 = 8000;
    /// Body of the liveness probe.
    pub const HEALTH_MESSAGE: &str = "Pio Pio";
}

/// Multipart form field names.
pub mod fields {
    /// Latitude field of the analyze form.
    pub const LAT: &str = "lat";
    /// Longitude field of the analyze form.
    pub const LON: &str = "lon";
    /// Audio file field of the analyze form.
    pub const AUDIO_SAMPLE: &str = "audio_sample";
    /// Audio file field of the identify form.
    pub const FILE: &str = "file";
}

/// Upload staging constants.
pub mod uploads {
    /// Default upload directory, relative to the working directory.
    pub const DEFAULT_DIR: &str = "uploads";
    /// Prefix for staged temporary files.
    pub const TEMP_PREFIX: &str = ".piopio-";
    /// Suffix used by the identify endpoint for staged files.
    pub const IDENTIFY_SUFFIX: &str = ".wav";
    /// Filename used when the client declares none.
    pub const FALLBACK_FILENAME: &str = "upload.bin";
}

/// Range filter constants.
pub mod range_filter {
    /// `BirdNET` uses 48 weeks per year.
    pub const WEEKS_PER_YEAR: u32 = 48;

    /// Days per `BirdNET` week (365.25 / 48).
    pub const DAYS_PER_WEEK: f32 = 7.6;

    /// First day of the year (January 1st) for week-to-day offset calculation.
    pub const YEAR_START_DAY: f32 = 1.0;

    /// Default range filter threshold.
    pub const DEFAULT_THRESHOLD: f32 = 0.01;
}

/// Calendar constants.
pub mod calendar {
    /// Days in each month (non-leap year).
    pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
}
