//! Mapping from a decoded feed to a publication package
//!
//! - [`PublicationMapper`] - produces a [`PublicationPackage`] from a [`FeedModel`](crate::feed::FeedModel)
//! - [`MapperConfig`] - language tag, chapter directory, extension and media type
//!
//! Manifest ids and chapter paths are both derived from item position, so two items
//! with the same title never collide.

mod mapper;
mod paths;
mod types;

pub use mapper::{MapError, MapperConfig, PublicationMapper, identifiers_for, manifest_id};
pub use paths::{UNTITLED, chapter_path, file_stem, slugify, title_or_untitled};
pub use types::{
    Chapter, Creator, Identifier, IdentifierScheme, ManifestEntry, PublicationMetadata,
    PublicationPackage,
};
