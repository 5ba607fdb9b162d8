//! Error types for piopio.

/// Result type alias for piopio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for piopio.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No model configured for the analyzer.
    #[error("no model configured (set [model] in config or pass --model-path and --labels-path)")]
    ModelNotConfigured,

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Labels file does not exist.
    #[error("labels file does not exist: {path}")]
    LabelsFileNotFound {
        /// Path to the missing labels file.
        path: std::path::PathBuf,
    },

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to resample audio.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },

    /// Failed to initialize ONNX runtime.
    #[error("failed to initialize ONNX runtime: {reason}")]
    RuntimeInitialization {
        /// Description of the initialization failure.
        reason: String,
    },

    /// Failed to build classifier.
    #[error("failed to build classifier: {reason}")]
    ClassifierBuild {
        /// Description of the build failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Failed to build range filter.
    #[error("failed to build range filter: {reason}")]
    RangeFilterBuild {
        /// Description of the build failure.
        reason: String,
    },

    /// Failed to predict location scores.
    #[error("failed to predict location scores: {reason}")]
    RangeFilterPredict {
        /// Description of the prediction failure.
        reason: String,
    },

    /// Location filtering requires a meta model.
    #[error("location filtering requires a meta model (set model.meta_model)")]
    MetaModelMissing,

    /// Meta model file not found.
    #[error("meta model file not found: {path}")]
    MetaModelNotFound {
        /// Path to the missing meta model file.
        path: std::path::PathBuf,
    },

    /// Multipart request body could not be read.
    #[error("malformed multipart request: {reason}")]
    MalformedUpload {
        /// Description of the multipart failure.
        reason: String,
    },

    /// Request body exceeded the configured upload limit.
    #[error("upload exceeds the size limit: {reason}")]
    UploadTooLarge {
        /// Description of the limit failure.
        reason: String,
    },

    /// A required form field was not supplied.
    #[error("missing required form field '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A numeric form field could not be parsed.
    #[error("form field '{field}' is not a valid number: '{value}'")]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// Raw value received.
        value: String,
    },

    /// Failed to stage an upload on disk.
    #[error("failed to store upload in '{path}'")]
    UploadStore {
        /// Upload directory or target path.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Classification is not wired into this endpoint.
    #[error("classification is not implemented for this endpoint")]
    ClassificationUnavailable,

    /// Failed to bind or run the HTTP server.
    #[error("server error on {addr}")]
    Server {
        /// Listening address.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Stable `snake_case` identifier used in JSON error bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigSerialize { .. } => "config",
            Self::ModelNotConfigured
            | Self::ModelFileNotFound { .. }
            | Self::LabelsFileNotFound { .. }
            | Self::MetaModelMissing
            | Self::MetaModelNotFound { .. } => "model_config",
            Self::AudioOpen { .. } | Self::AudioDecode { .. } | Self::NoAudioTracks { .. } => {
                "unsupported_audio"
            }
            Self::Resample { .. } => "resample",
            Self::RuntimeInitialization { .. } | Self::ClassifierBuild { .. } => "classifier_init",
            Self::Inference { .. }
            | Self::RangeFilterBuild { .. }
            | Self::RangeFilterPredict { .. } => "inference",
            Self::MalformedUpload { .. } => "malformed_upload",
            Self::UploadTooLarge { .. } => "upload_too_large",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::UploadStore { .. } => "upload_store",
            Self::ClassificationUnavailable => "not_implemented",
            Self::Server { .. } => "server",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether the error was caused by the client's request.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedUpload { .. }
                | Self::UploadTooLarge { .. }
                | Self::MissingField { .. }
                | Self::InvalidNumber { .. }
        )
    }
}
