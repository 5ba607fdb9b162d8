//! Shared state handed to every request handler.

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::server::upload::UploadStore;
use std::sync::Arc;

/// Application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<dyn Analyzer>,
    uploads: Arc<UploadStore>,
    min_confidence: f32,
}

impl AppState {
    /// Wire an analyzer and upload store into handler state.
    pub fn new(analyzer: Arc<dyn Analyzer>, uploads: UploadStore, min_confidence: f32) -> Self {
        Self {
            analyzer,
            uploads: Arc::new(uploads),
            min_confidence,
        }
    }

    /// Build state from the loaded configuration.
    pub fn from_config(analyzer: Arc<dyn Analyzer>, config: &Config) -> Self {
        let uploads = UploadStore::new(config.uploads.dir.clone(), config.uploads.retain);
        Self::new(analyzer, uploads, config.analysis.min_confidence)
    }

    /// The shared analyzer.
    pub fn analyzer(&self) -> Arc<dyn Analyzer> {
        Arc::clone(&self.analyzer)
    }

    /// Where uploads are staged.
    pub fn uploads(&self) -> Arc<UploadStore> {
        Arc::clone(&self.uploads)
    }

    /// Confidence floor for every analysis.
    pub const fn min_confidence(&self) -> f32 {
        self.min_confidence
    }
}
