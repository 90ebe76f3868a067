use tracing::debug;

use super::charset::{self, DecodeError};
use super::model::FeedModel;

/// Decode raw feed bytes into a [`FeedModel`]
///
/// `content_type` is the upstream `Content-Type` header, consulted only when the
/// document itself does not declare a charset.
pub fn parse_feed(bytes: &[u8], content_type: Option<&str>) -> Result<FeedModel, DecodeError> {
    let decoded = charset::decode(bytes, content_type)?;
    debug!(
        encoding = decoded.encoding.name(),
        source = ?decoded.source,
        "Feed charset resolved"
    );

    let channel = rss::Channel::read_from(decoded.text.as_bytes())
        .map_err(|e| DecodeError::InvalidFeed(e.to_string()))?;

    Ok(FeedModel::from(&channel))
}
