//! HTTP client for retrieving feed documents

use bytes::BytesMut;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

use super::charset::DecodeError;
use super::model::FeedModel;
use super::parse::parse_feed;
use crate::config::FetchConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Feed exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_redirect() {
            FetchError::TooManyRedirects
        } else {
            FetchError::RequestFailed(e.to_string())
        }
    }
}

/// Either half of the fetch phase can fail; the two are reported separately
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Fetches and decodes RSS feeds
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    max_feed_bytes: usize,
}

impl FeedFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_feed_bytes: config.max_feed_bytes.as_usize(),
        })
    }

    /// GET `url` and decode the body; no retries
    pub async fn fetch(&self, url: &str) -> Result<FeedModel, FeedError> {
        let (body, content_type) = self.download(url).await?;
        let feed = parse_feed(&body, content_type.as_deref())?;

        debug!(url, items = feed.items.len(), "Feed decoded");
        Ok(feed)
    }

    async fn download(&self, url: &str) -> Result<(BytesMut, Option<String>), FetchError> {
        debug!(url, "Fetching feed");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = self.read_capped(response).await?;
        debug!(url, size = body.len(), "Feed downloaded");

        Ok((body, content_type))
    }

    /// Read the body chunk by chunk, refusing anything over `max_feed_bytes`.
    /// The response is consumed here, so the connection is released on every path.
    async fn read_capped(&self, mut response: Response) -> Result<BytesMut, FetchError> {
        let limit = self.max_feed_bytes;

        if let Some(length) = response.content_length() {
            if length > limit as u64 {
                return Err(FetchError::TooLarge { limit });
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}
