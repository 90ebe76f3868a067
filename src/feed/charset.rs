//! Charset resolution and transcoding for raw feed bytes
//!
//! Precedence: byte-order mark, XML declaration, HTTP `Content-Type` charset, UTF-8.
//! Labels are resolved with the WHATWG encoding registry, so `ISO-8859-1` decodes
//! as windows-1252 exactly like a browser would.

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

/// Only the first bytes are scanned for an XML declaration
const PROLOG_SCAN_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported character set '{0}'")]
    UnsupportedCharset(String),

    #[error("feed bytes are not valid {0}")]
    MalformedText(&'static str),

    #[error("invalid RSS document: {0}")]
    InvalidFeed(String),
}

/// Where the winning charset came from; logged alongside decode results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSource {
    ByteOrderMark,
    XmlDeclaration,
    ContentType,
    Default,
}

#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    pub source: CharsetSource,
}

/// Transcode `bytes` to UTF-8, honouring whatever charset the document or transport declares
pub fn decode(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeError> {
    let (encoding, source) = resolve(bytes, content_type)?;

    // `decode` strips a BOM; a BOM also overrides `encoding`, which `resolve` already honoured
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::MalformedText(actual.name()));
    }

    Ok(DecodedText {
        text: strip_xml_declaration(&text).to_string(),
        encoding: actual,
        source,
    })
}

fn resolve(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<(&'static Encoding, CharsetSource), DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Ok((encoding, CharsetSource::ByteOrderMark));
    }

    if let Some(label) = declared_encoding(bytes) {
        return lookup(&label).map(|encoding| (encoding, CharsetSource::XmlDeclaration));
    }

    if let Some(label) = content_type.and_then(content_type_charset) {
        return lookup(&label).map(|encoding| (encoding, CharsetSource::ContentType));
    }

    Ok((UTF_8, CharsetSource::Default))
}

fn lookup(label: &str) -> Result<&'static Encoding, DecodeError> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DecodeError::UnsupportedCharset(label.to_string()))
}

/// The `encoding` pseudo-attribute of a leading `<?xml ...?>`, if any
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(PROLOG_SCAN_LIMIT)];
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let head = &head[start..];
    if !head.starts_with(b"<?xml") {
        return None;
    }

    let end = head.windows(2).position(|w| w == b"?>")?;
    // the prolog itself is ASCII in every ASCII-compatible charset
    let prolog = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &prolog[prolog.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let value = &value[..value.find(quote)?];

    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

fn content_type_charset(content_type: &str) -> Option<String> {
    let media_type: mime::Mime = content_type.parse().ok()?;
    media_type
        .get_param(mime::CHARSET)
        .map(|charset| charset.as_str().to_string())
}

/// Drop the declaration so the XML parser does not try to transcode a second time
fn strip_xml_declaration(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latin1_feed() -> Vec<u8> {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss><channel><title>Caf".to_vec();
        bytes.push(0xE9); // é in Latin-1
        bytes.extend_from_slice(b" M");
        bytes.push(0xFC); // ü
        bytes.extend_from_slice(b"ller</title></channel></rss>");
        bytes
    }

    #[test]
    fn declared_latin1_is_transcoded() {
        let decoded = decode(&latin1_feed(), None).unwrap();

        assert_eq!(decoded.source, CharsetSource::XmlDeclaration);
        assert!(decoded.text.contains("Café Müller"));
        assert!(!decoded.text.contains('\u{FFFD}'));
        assert!(decoded.text.starts_with("<rss>"));
    }

    #[test]
    fn declaration_beats_content_type() {
        let decoded = decode(&latin1_feed(), Some("text/xml; charset=utf-8")).unwrap();
        assert_eq!(decoded.source, CharsetSource::XmlDeclaration);
        assert!(decoded.text.contains("Café"));
    }

    #[test]
    fn content_type_used_without_declaration() {
        let bytes = b"<rss><channel><title>Gr\xFC\xDFe</title></channel></rss>";

        let decoded = decode(bytes, Some("application/rss+xml; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded.source, CharsetSource::ContentType);
        assert!(decoded.text.contains("Grüße"));
    }

    #[test]
    fn bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("<?xml version='1.0' encoding='ISO-8859-1'?><rss>é</rss>".as_bytes());

        let decoded = decode(&bytes, None).unwrap();
        assert_eq!(decoded.source, CharsetSource::ByteOrderMark);
        assert_eq!(decoded.text, "<rss>é</rss>");
    }

    #[test]
    fn defaults_to_utf8() {
        let decoded = decode("<rss>naïve</rss>".as_bytes(), None).unwrap();
        assert_eq!(decoded.source, CharsetSource::Default);
        assert_eq!(decoded.encoding, UTF_8);
        assert_eq!(decoded.text, "<rss>naïve</rss>");
    }

    #[test]
    fn unknown_label_is_rejected() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"x-klingon\"?><rss/>";

        let err = decode(bytes, None).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedCharset(label) if label == "x-klingon"));
    }

    #[test]
    fn invalid_utf8_is_rejected_not_replaced() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss>\xFF\xFE\xFD</rss>";

        let err = decode(bytes, None).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedText("UTF-8")));
    }

    #[test]
    fn reads_single_quoted_declaration() {
        let bytes = b"  <?xml version='1.0' encoding = 'windows-1251' ?><rss/>";
        assert_eq!(declared_encoding(bytes).as_deref(), Some("windows-1251"));
    }

    #[test]
    fn no_declaration_means_no_label() {
        assert_eq!(declared_encoding(b"<rss version=\"2.0\"/>"), None);
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><rss/>"), None);
    }
}
