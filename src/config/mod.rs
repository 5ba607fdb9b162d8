//! Configuration loading and management.

mod file;
mod overrides;
mod paths;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config, save_config};
pub use overrides::{apply_serve_args, resolve_config};
pub use paths::{config_dir, config_file_path};
pub use types::{
    AnalysisConfig, Config, InferenceConfig, InferenceDevice, ModelConfig, ServerConfig,
    UploadConfig,
};
pub use validate::{validate_config, validate_model_config};
