use std::collections::HashSet;
use std::io::{Cursor, Write};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use super::documents::{
    CONTENT_DIR, NAV_PATH, chapter_document, container_xml, navigation_document,
    package_document,
};
use super::{ArchiveBuilder, BuildError};
use crate::publication::{Chapter, ManifestEntry, PublicationMetadata, title_or_untitled};

pub const EPUB_MEDIA_TYPE: &str = "application/epub+zip";

/// Writes EPUB 3 containers entirely in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct EpubArchiveBuilder;

impl EpubArchiveBuilder {
    pub fn new() -> Self {
        Self
    }

    fn validate(manifest: &[ManifestEntry], chapters: &[Chapter]) -> Result<(), BuildError> {
        if manifest.is_empty() {
            return Err(BuildError::InvalidPackage("manifest is empty".into()));
        }

        let mut ids = HashSet::new();
        let mut paths = HashSet::new();
        for entry in manifest {
            if !ids.insert(entry.id.as_str()) {
                return Err(BuildError::InvalidPackage(format!(
                    "duplicate manifest id '{}'",
                    entry.id
                )));
            }
            if entry.path == NAV_PATH || !paths.insert(entry.path.as_str()) {
                return Err(BuildError::InvalidPackage(format!(
                    "duplicate manifest path '{}'",
                    entry.path
                )));
            }
        }

        for chapter in chapters {
            if !paths.contains(chapter.path.as_str()) {
                return Err(BuildError::InvalidPackage(format!(
                    "chapter '{}' has no manifest entry",
                    chapter.path
                )));
            }
        }

        Ok(())
    }

    fn write_zip(
        title: &str,
        metadata: &PublicationMetadata,
        manifest: &[ManifestEntry],
        chapters: &[Chapter],
    ) -> Result<Vec<u8>, BuildError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
        let deflated =
            FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

        // mimetype must be the first entry and uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(EPUB_MEDIA_TYPE.as_bytes())?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(&container_xml()?)?;

        zip.start_file(format!("{CONTENT_DIR}/content.opf"), deflated)?;
        zip.write_all(&package_document(title, metadata, manifest, Utc::now())?)?;

        zip.start_file(format!("{CONTENT_DIR}/{NAV_PATH}"), deflated)?;
        zip.write_all(&navigation_document(title, &metadata.language, chapters)?)?;

        for chapter in chapters {
            zip.start_file(format!("{CONTENT_DIR}/{}", chapter.path), deflated)?;
            zip.write_all(&chapter_document(&metadata.language, chapter)?)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

#[async_trait]
impl ArchiveBuilder for EpubArchiveBuilder {
    async fn build(
        &self,
        title: &str,
        metadata: &PublicationMetadata,
        manifest: &[ManifestEntry],
        chapters: &[Chapter],
    ) -> Result<Vec<u8>, BuildError> {
        Self::validate(manifest, chapters)?;

        let title = title_or_untitled(title);
        let bytes = Self::write_zip(title, metadata, manifest, chapters)?;
        debug!(title, chapters = chapters.len(), size = bytes.len(), "EPUB written");

        Ok(bytes)
    }

    fn media_type(&self) -> &'static str {
        EPUB_MEDIA_TYPE
    }

    fn file_extension(&self) -> &'static str {
        "epub"
    }
}
