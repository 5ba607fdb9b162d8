//! Piopio - bird species identification over HTTP.
//!
//! Clients upload a recording with the coordinates where it was taken and
//! receive the scientific name of the most likely species, as classified by
//! a `BirdNET` ONNX model.

#![warn(missing_docs)]

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod inference;
pub mod server;
pub mod utils;

use analysis::{Analyzer, BirdnetAnalyzer};
use clap::Parser;
use cli::{Cli, Command, ConfigAction, ServeArgs};
use config::{Config, config_file_path, load_config_file, save_config, validate_model_config};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use error::{Error, Result};

/// Main entry point for the piopio binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.serve.verbose, cli.serve.quiet);

    match cli.command {
        Some(Command::Config { action }) => handle_config_command(action, &cli.serve),
        Some(Command::Serve) | None => serve(&cli.serve),
    }
}

/// Load the model and run the HTTP server until shutdown.
fn serve(args: &ServeArgs) -> Result<()> {
    let config = config::resolve_config(args)?;
    let model = config.model.as_ref().ok_or(Error::ModelNotConfigured)?;
    validate_model_config(model)?;

    inference::init_runtime()?;

    info!("Loading model {}", model.path.display());
    let analyzer = BirdnetAnalyzer::from_config(model, &config.analysis, &config.inference)?;
    info!(
        "Analyzer '{}' ready (min confidence {:.2})",
        analyzer.name(),
        config.analysis.min_confidence
    );

    let analyzer: Arc<dyn Analyzer> = Arc::new(analyzer);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(&config, analyzer))
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT is silenced unless -vv or more; CPU fallback in auto mode is noisy.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_config_command(action: ConfigAction, args: &ServeArgs) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                print_next_steps(&path);
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_file(&path)?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn print_next_steps(path: &Path) {
    println!("\nNext steps:");
    println!("  Add a [model] section to {} with:", path.display());
    println!("    path = \"/path/to/BirdNET.onnx\"");
    println!("    labels = \"/path/to/labels.txt\"");
    println!("  or run: piopio serve --model-path <model.onnx> --labels-path <labels.txt>");
}
