use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Fetch timeout must be positive: {field} = 0")]
    ZeroTimeout { field: &'static str },

    #[error("fetch.max_feed_bytes must be positive")]
    ZeroFeedLimit,

    #[error("publication.{field} must not be empty")]
    EmptyPublicationField { field: &'static str },

    #[error("publication.chapter_dir '{0}' must be a relative path without '..'")]
    InvalidChapterDir(String),

    #[error("publication.chapter_media_type '{0}' is not a valid media type")]
    InvalidMediaType(String),
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_fetch(config)?;
    validate_publication(config)?;
    Ok(())
}

fn validate_fetch(config: &Config) -> Result<(), ValidationError> {
    if config.fetch.connect_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "connect_timeout_ms",
        });
    }

    if config.fetch.request_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "request_timeout_ms",
        });
    }

    if config.fetch.max_feed_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroFeedLimit);
    }

    Ok(())
}

fn validate_publication(config: &Config) -> Result<(), ValidationError> {
    let publication = &config.publication;

    let fields = [
        ("language", &publication.language),
        ("chapter_dir", &publication.chapter_dir),
        ("chapter_extension", &publication.chapter_extension),
        ("chapter_media_type", &publication.chapter_media_type),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyPublicationField { field });
        }
    }

    let dir = &publication.chapter_dir;
    if dir.starts_with('/') || dir.split('/').any(|segment| segment == "..") {
        return Err(ValidationError::InvalidChapterDir(dir.clone()));
    }

    if publication.chapter_media_type.parse::<mime::Mime>().is_err() {
        return Err(ValidationError::InvalidMediaType(
            publication.chapter_media_type.clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_request_timeout() {
        let mut config = Config::default();
        config.fetch.request_timeout_ms = 0;

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::ZeroTimeout {
                field: "request_timeout_ms"
            })
        ));
    }

    #[test]
    fn test_zero_feed_limit() {
        let mut config = Config::default();
        config.fetch.max_feed_bytes = crate::humanize::ByteSize(0);

        assert!(matches!(validate(&config), Err(ValidationError::ZeroFeedLimit)));
    }

    #[test]
    fn test_empty_language() {
        let mut config = Config::default();
        config.publication.language = "  ".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::EmptyPublicationField { field: "language" })
        ));
    }

    #[test]
    fn test_chapter_dir_escape() {
        let mut config = Config::default();
        config.publication.chapter_dir = "../outside".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidChapterDir(_))
        ));
    }

    #[test]
    fn test_bad_media_type() {
        let mut config = Config::default();
        config.publication.chapter_media_type = "xhtml".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidMediaType(_))
        ));
    }
}
