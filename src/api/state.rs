use std::sync::Arc;

use crate::archive::EpubArchiveBuilder;
use crate::config::Config;
use crate::feed::FetchError;
use crate::observability::Metrics;
use crate::pipeline::BookPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<BookPipeline>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// State for serving EPUBs with the given configuration
    pub fn new(config: Config) -> Result<Self, FetchError> {
        let metrics = Arc::new(Metrics::new());
        let pipeline = BookPipeline::from_config(
            &config,
            Arc::new(EpubArchiveBuilder::new()),
            metrics.clone(),
        )?;

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            metrics,
        })
    }
}
