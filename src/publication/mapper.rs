use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::paths::{chapter_path, title_or_untitled};
use super::types::{
    Chapter, Creator, Identifier, IdentifierScheme, ManifestEntry, PublicationMetadata,
    PublicationPackage,
};
use crate::config::PublicationConfig;
use crate::feed::{FeedItem, FeedModel};

const AUTHOR_ROLE: &str = "aut";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("feed has no items to build")]
    EmptyFeed,
}

/// Fixed values the mapper stamps onto every package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    pub language: String,
    pub chapter_dir: String,
    pub chapter_extension: String,
    pub chapter_media_type: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig::from(&PublicationConfig::default())
    }
}

impl From<&PublicationConfig> for MapperConfig {
    fn from(config: &PublicationConfig) -> Self {
        Self {
            language: config.language.clone(),
            chapter_dir: config.chapter_dir.clone(),
            chapter_extension: config.chapter_extension.clone(),
            chapter_media_type: config.chapter_media_type.clone(),
        }
    }
}

/// Turns a decoded feed into a [`PublicationPackage`]
#[derive(Debug, Clone, Default)]
pub struct PublicationMapper {
    config: MapperConfig,
}

impl PublicationMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// All or nothing: a feed without items yields [`MapError::EmptyFeed`]
    pub fn map(&self, feed: &FeedModel) -> Result<PublicationPackage, MapError> {
        let first = feed.items.first().ok_or(MapError::EmptyFeed)?;

        // Only the first item's author is credited
        let creator = Creator {
            name: first.author.clone().unwrap_or_default(),
            role: AUTHOR_ROLE.to_string(),
        };

        let metadata = PublicationMetadata {
            title: title_or_untitled(&feed.title).to_string(),
            language: self.config.language.clone(),
            creator,
            date: feed.last_build_time().map(|date| date.with_timezone(&Utc)),
            identifiers: identifiers_for(&feed.base_link),
        };

        let (manifest, chapters): (Vec<_>, Vec<_>) = feed
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| self.map_item(index, item))
            .unzip();

        Ok(PublicationPackage {
            metadata,
            manifest,
            chapters,
        })
    }

    fn map_item(&self, index: usize, item: &FeedItem) -> (ManifestEntry, Chapter) {
        let path = chapter_path(
            &self.config.chapter_dir,
            index,
            &item.title,
            &self.config.chapter_extension,
        );

        let title = if item.title.trim().is_empty() {
            format!("Chapter {}", index + 1)
        } else {
            item.title.clone()
        };

        let entry = ManifestEntry {
            id: manifest_id(index),
            path: path.clone(),
            media_type: self.config.chapter_media_type.clone(),
        };

        let chapter = Chapter {
            path,
            title,
            body: item.description.clone(),
        };

        (entry, chapter)
    }
}

pub fn manifest_id(index: usize) -> String {
    format!("chapter_{index}")
}

/// `urn:uuid:` v5 of the base link, plus the link itself when there is one
pub fn identifiers_for(base_link: &str) -> Vec<Identifier> {
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, base_link.as_bytes());

    let mut identifiers = vec![Identifier {
        value: uuid.urn().to_string(),
        scheme: IdentifierScheme::Urn,
    }];

    if !base_link.is_empty() {
        identifiers.push(Identifier {
            value: base_link.to_string(),
            scheme: IdentifierScheme::Uri,
        });
    }

    identifiers
}
