//! Fetch -> map -> build, strictly in that order
//!
//! [`BookPipeline::build_publication`] is the single entry point used by both the
//! HTTP handler and the CLI. Every failure is terminal; nothing partial is returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::archive::{ArchiveBuilder, BuildError};
use crate::config::Config;
use crate::feed::{DecodeError, FeedError, FeedFetcher, FetchError};
use crate::observability::Metrics;
use crate::publication::{MapError, MapperConfig, PublicationMapper, file_stem};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("mapping failed: {0}")]
    Map(#[from] MapError),

    #[error("archive build failed: {0}")]
    Build(#[from] BuildError),
}

impl From<FeedError> for PipelineError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Fetch(e) => PipelineError::Fetch(e),
            FeedError::Decode(e) => PipelineError::Decode(e),
        }
    }
}

impl PipelineError {
    /// Stage that failed, for logs
    pub fn phase(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Decode(_) => "decode",
            PipelineError::Map(_) => "map",
            PipelineError::Build(_) => "build",
        }
    }

    /// Short text safe to show callers; never the underlying error
    pub fn public_message(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) | PipelineError::Decode(_) => "Server error",
            PipelineError::Map(MapError::EmptyFeed) => "Unable to generate OPF",
            PipelineError::Build(_) => "Server Error",
        }
    }
}

/// A finished archive plus what a caller needs to name and serve it
#[derive(Debug, Clone)]
pub struct BuiltBook {
    pub title: String,
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub extension: &'static str,
}

impl BuiltBook {
    /// `<title>.<extension>`, with the title made safe for file systems and headers
    pub fn file_name(&self) -> String {
        format!("{}.{}", file_stem(&self.title), self.extension)
    }

    /// Write the archive to `output`, or to [`BuiltBook::file_name`] in the working directory
    pub async fn write_to(&self, output: Option<&Path>) -> std::io::Result<PathBuf> {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(self.file_name()));
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

pub struct BookPipeline {
    fetcher: FeedFetcher,
    mapper: PublicationMapper,
    builder: Arc<dyn ArchiveBuilder>,
    metrics: Arc<Metrics>,
}

impl BookPipeline {
    pub fn new(
        fetcher: FeedFetcher,
        mapper: PublicationMapper,
        builder: Arc<dyn ArchiveBuilder>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            fetcher,
            mapper,
            builder,
            metrics,
        }
    }

    /// Wire up the pipeline from configuration with the given archive format
    pub fn from_config(
        config: &Config,
        builder: Arc<dyn ArchiveBuilder>,
        metrics: Arc<Metrics>,
    ) -> Result<Self, FetchError> {
        let fetcher = FeedFetcher::new(&config.fetch)?;
        let mapper = PublicationMapper::new(MapperConfig::from(&config.publication));
        Ok(Self::new(fetcher, mapper, builder, metrics))
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Fetch `url`, map it, and serialize the result
    ///
    /// `url` must already be validated as absolute.
    pub async fn build_publication(&self, url: &str) -> Result<BuiltBook, PipelineError> {
        let result = self.run(url).await;

        match &result {
            Ok(book) => {
                self.metrics.book_built();
                info!(url, title = %book.title, size = book.bytes.len(), "Publication built");
            }
            Err(e) => {
                self.metrics.book_failed();
                warn!(url, phase = e.phase(), error = %e, "Publication build failed");
            }
        }

        result
    }

    async fn run(&self, url: &str) -> Result<BuiltBook, PipelineError> {
        let feed = self.fetcher.fetch(url).await?;
        self.metrics.feed_fetched();

        let package = self.mapper.map(&feed)?;

        let bytes = self
            .builder
            .build(
                &feed.title,
                &package.metadata,
                &package.manifest,
                &package.chapters,
            )
            .await?;

        Ok(BuiltBook {
            title: feed.title,
            bytes,
            media_type: self.builder.media_type(),
            extension: self.builder.file_extension(),
        })
    }
}
