//! Validation of the `rssurl` query parameter

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedUrlError {
    #[error("rssurl parameter is missing")]
    Missing,
    #[error("rssurl is not an absolute URL: {0}")]
    Unparsable(String),
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes and checks a feed URL supplied by a client
///
/// `feed://` is treated as an alias for `http://`. Only http and https URLs with a
/// host are accepted.
pub fn parse_feed_url(raw: Option<&str>) -> Result<Url, FeedUrlError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(FeedUrlError::Missing)?;

    let rewritten = match raw.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("feed://") => format!("http://{}", &raw[7..]),
        _ => raw.to_string(),
    };

    // Url::parse rejects relative references outright
    let url = Url::parse(&rewritten).map_err(|e| FeedUrlError::Unparsable(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(FeedUrlError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(FeedUrlError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        let url = parse_feed_url(Some("https://blog.example.com/rss.xml")).unwrap();
        assert_eq!(url.as_str(), "https://blog.example.com/rss.xml");
        assert!(parse_feed_url(Some("http://blog.example.com/feed?x=1")).is_ok());
    }

    #[test]
    fn rewrites_feed_scheme() {
        let url = parse_feed_url(Some("feed://blog.example.com/rss")).unwrap();
        assert_eq!(url.as_str(), "http://blog.example.com/rss");

        let url = parse_feed_url(Some("FEED://blog.example.com/rss")).unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn missing_or_blank_is_rejected() {
        assert_eq!(parse_feed_url(None), Err(FeedUrlError::Missing));
        assert_eq!(parse_feed_url(Some("   ")), Err(FeedUrlError::Missing));
    }

    #[test]
    fn relative_and_garbage_are_rejected() {
        assert!(matches!(
            parse_feed_url(Some("not-a-url")),
            Err(FeedUrlError::Unparsable(_))
        ));
        assert!(matches!(
            parse_feed_url(Some("/rss.xml")),
            Err(FeedUrlError::Unparsable(_))
        ));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert_eq!(
            parse_feed_url(Some("ftp://example.com/rss")),
            Err(FeedUrlError::UnsupportedScheme("ftp".into()))
        );
        assert_eq!(
            parse_feed_url(Some("file:///etc/passwd")),
            Err(FeedUrlError::UnsupportedScheme("file".into()))
        );
    }
}
