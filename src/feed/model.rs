use chrono::{DateTime, FixedOffset};

/// A decoded RSS channel, items in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedModel {
    pub title: String,
    /// `<lastBuildDate>` exactly as published
    pub last_build_date: Option<String>,
    pub base_link: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub author: Option<String>,
    /// Raw markup, never rewritten
    pub description: String,
    pub link: String,
}

impl FeedModel {
    /// `last_build_date` parsed as RFC 2822, when it is well formed
    pub fn last_build_time(&self) -> Option<DateTime<FixedOffset>> {
        self.last_build_date
            .as_deref()
            .and_then(|date| DateTime::parse_from_rfc2822(date.trim()).ok())
    }
}

impl From<&rss::Channel> for FeedModel {
    fn from(channel: &rss::Channel) -> Self {
        Self {
            title: channel.title().trim().to_string(),
            last_build_date: channel
                .last_build_date()
                .map(str::trim)
                .filter(|date| !date.is_empty())
                .map(str::to_owned),
            base_link: channel.link().trim().to_string(),
            items: channel.items().iter().map(FeedItem::from).collect(),
        }
    }
}

impl From<&rss::Item> for FeedItem {
    fn from(item: &rss::Item) -> Self {
        // <author> first, then the first dc:creator
        let author = item
            .author()
            .or_else(|| {
                item.dublin_core_ext()
                    .and_then(|dc| dc.creators().first())
                    .map(String::as_str)
            })
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(str::to_owned);

        Self {
            title: item.title().unwrap_or_default().trim().to_string(),
            author,
            description: item.description().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc2822_build_date() {
        let feed = FeedModel {
            last_build_date: Some("Tue, 10 Jun 2003 04:00:00 GMT".to_string()),
            ..Default::default()
        };

        let parsed = feed.last_build_time().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2003-06-10T04:00:00+00:00");
    }

    #[test]
    fn unparseable_build_date_is_none() {
        let feed = FeedModel {
            last_build_date: Some("last tuesday".to_string()),
            ..Default::default()
        };

        assert!(feed.last_build_time().is_none());
    }
}
