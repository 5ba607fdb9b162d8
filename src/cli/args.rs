//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bird species identification service for uploaded recordings.
#[derive(Debug, Parser)]
#[command(name = "piopio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (defaults to `serve`).
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for the HTTP server.
    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve,
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the HTTP server.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ServeArgs {
    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "PIOPIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind host.
    #[arg(long, global = true, env = "PIOPIO_HOST")]
    pub host: Option<String>,

    /// Bind port.
    #[arg(short, long, global = true, env = "PIOPIO_PORT")]
    pub port: Option<u16>,

    /// Path to ONNX model file (overrides config).
    #[arg(long, global = true, env = "PIOPIO_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Path to labels file (overrides config).
    #[arg(long, global = true, env = "PIOPIO_LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Path to meta model used for location filtering (overrides config).
    #[arg(long, global = true, env = "PIOPIO_META_MODEL_PATH")]
    pub meta_model_path: Option<PathBuf>,

    /// Minimum confidence threshold (0.0-1.0).
    #[arg(short = 'c', long, global = true, env = "PIOPIO_MIN_CONFIDENCE")]
    pub min_confidence: Option<f32>,

    /// Directory where uploads are staged.
    #[arg(long, global = true, env = "PIOPIO_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Keep analyzed uploads on disk.
    #[arg(long, global = true)]
    pub retain_uploads: bool,

    /// Filter species by the coordinates sent with each request.
    #[arg(long, global = true)]
    pub location_filter: bool,

    /// Use GPU for inference.
    #[arg(long, global = true, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Use CPU for inference.
    #[arg(long, global = true, conflicts_with = "gpu")]
    pub cpu: bool,

    /// Suppress non-error output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
