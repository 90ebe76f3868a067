use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub publication: PublicationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Map pipeline failures to 422/500/502 instead of answering 400 for everything
    #[serde(default)]
    pub distinct_error_status: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            distinct_error_status: false,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8081))
}

/// Outbound feed fetch settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Upper bound for the whole GET, body included
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_max_feed_bytes")]
    pub max_feed_bytes: ByteSize,
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            max_feed_bytes: default_max_feed_bytes(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("feedpub/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_feed_bytes() -> ByteSize {
    ByteSize::mebibytes(10)
}

/// Fixed values stamped onto every generated publication
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublicationConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_chapter_dir")]
    pub chapter_dir: String,
    #[serde(default = "default_chapter_extension")]
    pub chapter_extension: String,
    #[serde(default = "default_chapter_media_type")]
    pub chapter_media_type: String,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            chapter_dir: default_chapter_dir(),
            chapter_extension: default_chapter_extension(),
            chapter_media_type: default_chapter_media_type(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_chapter_dir() -> String {
    "chapters".to_string()
}

fn default_chapter_extension() -> String {
    "xhtml".to_string()
}

fn default_chapter_media_type() -> String {
    "application/xhtml+xml".to_string()
}
