//! Command-line overrides on top of the configuration file.

use crate::cli::ServeArgs;
use crate::config::types::{Config, InferenceDevice, ModelConfig};
use crate::config::{load_config_file, load_default_config, validate_config};
use crate::error::{Error, Result};

/// Load the config file named by `--config` (or the default one), apply the
/// remaining arguments and validate the result.
pub fn resolve_config(args: &ServeArgs) -> Result<Config> {
    let config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_default_config()?,
    };
    let config = apply_serve_args(config, args)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply CLI arguments to a loaded configuration.
///
/// `--model-path` and `--labels-path` replace the configured model; one
/// without the other is only accepted when the config file supplies the rest.
pub fn apply_serve_args(mut config: Config, args: &ServeArgs) -> Result<Config> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.analysis.min_confidence = min_confidence;
    }
    if let Some(dir) = &args.upload_dir {
        config.uploads.dir.clone_from(dir);
    }
    if args.retain_uploads {
        config.uploads.retain = true;
    }
    if args.location_filter {
        config.analysis.location_filter = true;
    }

    if args.gpu {
        config.inference.device = InferenceDevice::Gpu;
    } else if args.cpu {
        config.inference.device = InferenceDevice::Cpu;
    }

    config.model = match (config.model.take(), &args.model_path, &args.labels_path) {
        (existing, Some(path), Some(labels)) => Some(ModelConfig {
            path: path.clone(),
            labels: labels.clone(),
            meta_model: existing.and_then(|model| model.meta_model),
        }),
        (Some(mut model), path, labels) => {
            if let Some(path) = path {
                model.path.clone_from(path);
            }
            if let Some(labels) = labels {
                model.labels.clone_from(labels);
            }
            Some(model)
        }
        (None, Some(_), None) | (None, None, Some(_)) => {
            return Err(Error::ConfigValidation {
                message: "--model-path and --labels-path must be given together".to_string(),
            });
        }
        (None, None, None) => None,
    };

    if let Some(meta) = &args.meta_model_path {
        match config.model.as_mut() {
            Some(model) => model.meta_model = Some(meta.clone()),
            None => return Err(Error::ModelNotConfigured),
        }
    }

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_no_args_keeps_config() {
        let config = apply_serve_args(Config::default(), &ServeArgs::default()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.analysis.min_confidence, 0.25);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_args_override_config_values() {
        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(8080),
            min_confidence: Some(0.4),
            upload_dir: Some(PathBuf::from("/tmp/piopio")),
            retain_uploads: true,
            cpu: true,
            ..ServeArgs::default()
        };

        let config = apply_serve_args(Config::default(), &args).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.analysis.min_confidence, 0.4);
        assert_eq!(config.uploads.dir, PathBuf::from("/tmp/piopio"));
        assert!(config.uploads.retain);
        assert_eq!(config.inference.device, InferenceDevice::Cpu);
    }

    #[test]
    fn test_model_paths_replace_configured_model() {
        let mut config = Config::default();
        config.model = Some(ModelConfig {
            path: PathBuf::from("old.onnx"),
            labels: PathBuf::from("old.txt"),
            meta_model: Some(PathBuf::from("meta.onnx")),
        });

        let args = ServeArgs {
            model_path: Some(PathBuf::from("new.onnx")),
            ..ServeArgs::default()
        };
        let config = apply_serve_args(config, &args).unwrap();
        let model = config.model.unwrap();
        assert_eq!(model.path, PathBuf::from("new.onnx"));
        assert_eq!(model.labels, PathBuf::from("old.txt"));
        assert_eq!(model.meta_model, Some(PathBuf::from("meta.onnx")));
    }

    #[test]
    fn test_model_and_labels_keep_configured_meta_model() {
        let mut config = Config::default();
        config.analysis.location_filter = true;
        config.model = Some(ModelConfig {
            path: PathBuf::from("old.onnx"),
            labels: PathBuf::from("old.txt"),
            meta_model: Some(PathBuf::from("meta.onnx")),
        });

        let args = ServeArgs {
            model_path: Some(PathBuf::from("new.onnx")),
            labels_path: Some(PathBuf::from("new.txt")),
            ..ServeArgs::default()
        };
        let config = apply_serve_args(config, &args).unwrap();
        assert!(crate::config::validate_config(&config).is_ok());

        let model = config.model.unwrap();
        assert_eq!(model.path, PathBuf::from("new.onnx"));
        assert_eq!(model.labels, PathBuf::from("new.txt"));
        assert_eq!(model.meta_model, Some(PathBuf::from("meta.onnx")));
    }

    #[test]
    fn test_model_path_without_labels_is_rejected() {
        let args = ServeArgs {
            model_path: Some(PathBuf::from("model.onnx")),
            ..ServeArgs::default()
        };
        let result = apply_serve_args(Config::default(), &args);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_meta_model_without_model_is_rejected() {
        let args = ServeArgs {
            meta_model_path: Some(PathBuf::from("meta.onnx")),
            ..ServeArgs::default()
        };
        let result = apply_serve_args(Config::default(), &args);
        assert!(matches!(result, Err(Error::ModelNotConfigured)));
    }
}
