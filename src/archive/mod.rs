//! Serialization of a publication package into a downloadable container
//!
//! The pipeline only sees [`ArchiveBuilder`]; [`EpubArchiveBuilder`] is the
//! implementation wired in by the server and the CLI.

mod documents;
mod epub;

pub use epub::EpubArchiveBuilder;

use async_trait::async_trait;
use thiserror::Error;

use crate::publication::{Chapter, ManifestEntry, PublicationMetadata};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid package: {0}")]
    InvalidPackage(String),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes a package; implementations must not retry or return partial output
#[async_trait]
pub trait ArchiveBuilder: Send + Sync {
    async fn build(
        &self,
        title: &str,
        metadata: &PublicationMetadata,
        manifest: &[ManifestEntry],
        chapters: &[Chapter],
    ) -> Result<Vec<u8>, BuildError>;

    /// MIME type of the produced bytes
    fn media_type(&self) -> &'static str;

    /// File extension for downloads, without the dot
    fn file_extension(&self) -> &'static str;
}
