use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::extract::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub extractor: Arc<TextExtractor>,
    pub config: Config,
    /// Held from writing the upload until its analysis returns. The upload path
    /// is a single fixed file, so only one resume is in flight at a time.
    pub pipeline_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, extractor: TextExtractor, config: Config) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            extractor: Arc::new(extractor),
            config,
            pipeline_lock: Arc::new(Mutex::new(())),
        }
    }
}
