use std::fmt;

use chrono::{DateTime, Utc};

/// Identifier schemes emitted in package metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierScheme {
    Urn,
    Uri,
}

impl IdentifierScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierScheme::Urn => "URN",
            IdentifierScheme::Uri => "URI",
        }
    }
}

impl fmt::Display for IdentifierScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
    pub scheme: IdentifierScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    /// Empty when the feed names no author
    pub name: String,
    /// MARC relator code, `aut` for feed authors
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationMetadata {
    pub title: String,
    pub language: String,
    pub creator: Creator,
    /// Feed build time, when the feed states one that parses
    pub date: Option<DateTime<Utc>>,
    /// Never empty; the first entry is the package's unique identifier
    pub identifiers: Vec<Identifier>,
}

impl PublicationMetadata {
    pub fn primary_identifier(&self) -> Option<&Identifier> {
        self.identifiers.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    /// Relative to the package document
    pub path: String,
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Always equal to the matching [`ManifestEntry::path`]
    pub path: String,
    pub title: String,
    pub body: String,
}

/// Everything the archive builder needs, manifest and chapters in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationPackage {
    pub metadata: PublicationMetadata,
    pub manifest: Vec<ManifestEntry>,
    pub chapters: Vec<Chapter>,
}
