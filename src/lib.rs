pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod frequency;
pub mod metadata;
pub mod readability;
pub mod report;
pub mod seo;
pub mod stopwords;
pub mod telemetry;
pub mod text;

use std::sync::Arc;

use analysis::Analyzer;
use config::Config;
use error::Result;
use fetcher::Fetcher;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch.clone())?;
        let analyzer = Analyzer::new(fetcher, config.analysis.clone());
        Ok(Self {
            config: Arc::new(config),
            analyzer,
        })
    }
}
