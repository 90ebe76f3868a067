//! XML documents inside the EPUB container

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use super::BuildError;
use crate::publication::{Chapter, ManifestEntry, PublicationMetadata};

type XmlWriter = Writer<Cursor<Vec<u8>>>;

pub const PACKAGE_PATH: &str = "OEBPS/content.opf";
pub const CONTENT_DIR: &str = "OEBPS";
pub const NAV_PATH: &str = "nav.xhtml";
const NAV_ID: &str = "nav";
const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
const PACKAGE_ID: &str = "pub-id";
const W3CDTF_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";

fn new_writer() -> Result<XmlWriter, BuildError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

fn finish(writer: XmlWriter) -> Vec<u8> {
    writer.into_inner().into_inner()
}

fn text_element(writer: &mut XmlWriter, start: BytesStart<'_>, text: &str) -> Result<(), BuildError> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// `META-INF/container.xml`
pub fn container_xml() -> Result<Vec<u8>, BuildError> {
    let mut writer = new_writer()?;

    writer.write_event(Event::Start(BytesStart::new("container").with_attributes([
        ("version", "1.0"),
        ("xmlns", "urn:oasis:names:tc:opendocument:xmlns:container"),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("rootfiles")))?;
    writer.write_event(Event::Empty(BytesStart::new("rootfile").with_attributes([
        ("full-path", PACKAGE_PATH),
        ("media-type", "application/oebps-package+xml"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("rootfiles")))?;
    writer.write_event(Event::End(BytesEnd::new("container")))?;

    Ok(finish(writer))
}

/// The EPUB 3 package document
pub fn package_document(
    title: &str,
    metadata: &PublicationMetadata,
    manifest: &[ManifestEntry],
    modified: DateTime<Utc>,
) -> Result<Vec<u8>, BuildError> {
    let mut writer = new_writer()?;

    writer.write_event(Event::Start(BytesStart::new("package").with_attributes([
        ("xmlns", "http://www.idpf.org/2007/opf"),
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ("unique-identifier", PACKAGE_ID),
        ("version", "3.0"),
    ])))?;

    write_metadata(&mut writer, title, metadata, modified)?;

    writer.write_event(Event::Start(BytesStart::new("manifest")))?;
    writer.write_event(Event::Empty(BytesStart::new("item").with_attributes([
        ("id", NAV_ID),
        ("href", NAV_PATH),
        ("media-type", XHTML_MEDIA_TYPE),
        ("properties", "nav"),
    ])))?;
    for entry in manifest {
        writer.write_event(Event::Empty(BytesStart::new("item").with_attributes([
            ("id", entry.id.as_str()),
            ("href", entry.path.as_str()),
            ("media-type", entry.media_type.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("manifest")))?;

    // reading order is manifest order
    writer.write_event(Event::Start(BytesStart::new("spine")))?;
    for entry in manifest {
        writer.write_event(Event::Empty(
            BytesStart::new("itemref").with_attributes([("idref", entry.id.as_str())]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("spine")))?;

    writer.write_event(Event::End(BytesEnd::new("package")))?;
    Ok(finish(writer))
}

fn write_metadata(
    writer: &mut XmlWriter,
    title: &str,
    metadata: &PublicationMetadata,
    modified: DateTime<Utc>,
) -> Result<(), BuildError> {
    writer.write_event(Event::Start(BytesStart::new("metadata")))?;

    for (index, identifier) in metadata.identifiers.iter().enumerate() {
        let id = if index == 0 {
            PACKAGE_ID.to_string()
        } else {
            format!("{PACKAGE_ID}-{index}")
        };
        text_element(
            writer,
            BytesStart::new("dc:identifier").with_attributes([("id", id.as_str())]),
            &identifier.value,
        )?;
        text_element(
            writer,
            BytesStart::new("meta").with_attributes([
                ("refines", format!("#{id}").as_str()),
                ("property", "identifier-type"),
            ]),
            identifier.scheme.as_str(),
        )?;
    }

    text_element(writer, BytesStart::new("dc:title"), title)?;
    text_element(writer, BytesStart::new("dc:language"), &metadata.language)?;

    text_element(
        writer,
        BytesStart::new("dc:creator").with_attributes([("id", "creator")]),
        &metadata.creator.name,
    )?;
    text_element(
        writer,
        BytesStart::new("meta").with_attributes([
            ("refines", "#creator"),
            ("property", "role"),
            ("scheme", "marc:relators"),
        ]),
        &metadata.creator.role,
    )?;

    if let Some(date) = &metadata.date {
        text_element(
            writer,
            BytesStart::new("dc:date"),
            &date.format(W3CDTF_SECONDS).to_string(),
        )?;
    }

    text_element(
        writer,
        BytesStart::new("meta").with_attributes([("property", "dcterms:modified")]),
        &modified.format(W3CDTF_SECONDS).to_string(),
    )?;

    writer.write_event(Event::End(BytesEnd::new("metadata")))?;
    Ok(())
}

fn xhtml_head(writer: &mut XmlWriter, language: &str, title: &str) -> Result<(), BuildError> {
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    writer.write_event(Event::Start(BytesStart::new("html").with_attributes([
        ("xmlns", "http://www.w3.org/1999/xhtml"),
        ("xmlns:epub", "http://www.idpf.org/2007/ops"),
        ("xml:lang", language),
        ("lang", language),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("head")))?;
    text_element(writer, BytesStart::new("title"), title)?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;
    Ok(())
}

/// Navigation document listing every chapter in reading order
pub fn navigation_document(
    title: &str,
    language: &str,
    chapters: &[Chapter],
) -> Result<Vec<u8>, BuildError> {
    let mut writer = new_writer()?;
    xhtml_head(&mut writer, language, title)?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    writer.write_event(Event::Start(
        BytesStart::new("nav").with_attributes([("epub:type", "toc"), ("id", "toc")]),
    ))?;
    if !title.is_empty() {
        text_element(&mut writer, BytesStart::new("h1"), title)?;
    }

    writer.write_event(Event::Start(BytesStart::new("ol")))?;
    for chapter in chapters {
        writer.write_event(Event::Start(BytesStart::new("li")))?;
        text_element(
            &mut writer,
            BytesStart::new("a").with_attributes([("href", chapter.path.as_str())]),
            &chapter.title,
        )?;
        writer.write_event(Event::End(BytesEnd::new("li")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ol")))?;

    writer.write_event(Event::End(BytesEnd::new("nav")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    Ok(finish(writer))
}

/// One chapter; the body markup is written through untouched
pub fn chapter_document(language: &str, chapter: &Chapter) -> Result<Vec<u8>, BuildError> {
    let mut writer = new_writer()?;
    xhtml_head(&mut writer, language, &chapter.title)?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    writer.write_event(Event::Text(BytesText::from_escaped(chapter.body.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    Ok(finish(writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::{Creator, Identifier, IdentifierScheme};

    fn metadata() -> PublicationMetadata {
        PublicationMetadata {
            title: "Daily News".to_string(),
            language: "en".to_string(),
            creator: Creator {
                name: "Ed & Co".to_string(),
                role: "aut".to_string(),
            },
            date: Some(
                DateTime::parse_from_rfc3339("2025-01-05T21:15:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            identifiers: vec![
                Identifier {
                    value: "urn:uuid:0000".to_string(),
                    scheme: IdentifierScheme::Urn,
                },
                Identifier {
                    value: "https://news.example.com/".to_string(),
                    scheme: IdentifierScheme::Uri,
                },
            ],
        }
    }

    fn entries() -> Vec<ManifestEntry> {
        vec![
            ManifestEntry {
                id: "chapter_0".to_string(),
                path: "chapters/0001-a.xhtml".to_string(),
                media_type: XHTML_MEDIA_TYPE.to_string(),
            },
            ManifestEntry {
                id: "chapter_1".to_string(),
                path: "chapters/0002-b.xhtml".to_string(),
                media_type: XHTML_MEDIA_TYPE.to_string(),
            },
        ]
    }

    #[test]
    fn container_points_at_package() {
        let xml = String::from_utf8(container_xml().unwrap()).unwrap();
        assert!(xml.contains(r#"full-path="OEBPS/content.opf""#));
    }

    #[test]
    fn package_lists_manifest_and_spine_in_order() {
        let modified = DateTime::parse_from_rfc3339("2025-01-06T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let xml =
            String::from_utf8(package_document("Daily News", &metadata(), &entries(), modified).unwrap())
                .unwrap();

        assert!(xml.contains(r#"<dc:identifier id="pub-id">urn:uuid:0000</dc:identifier>"#));
        assert!(xml.contains(r#"<dc:identifier id="pub-id-1">https://news.example.com/</dc:identifier>"#));
        assert!(xml.contains("<dc:title>Daily News</dc:title>"));
        assert!(xml.contains("Ed &amp; Co"));
        assert!(xml.contains("<dc:date>2025-01-05T21:15:00Z</dc:date>"));
        assert!(xml.contains(r#"<meta property="dcterms:modified">2025-01-06T08:00:00Z</meta>"#));
        assert!(xml.contains(r#"<item id="nav" href="nav.xhtml""#));

        let first = xml.find(r#"<itemref idref="chapter_0"/>"#).unwrap();
        let second = xml.find(r#"<itemref idref="chapter_1"/>"#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn undated_package_has_no_dc_date() {
        let mut metadata = metadata();
        metadata.date = None;

        let xml =
            String::from_utf8(package_document("Daily News", &metadata, &entries(), Utc::now()).unwrap())
                .unwrap();
        assert!(!xml.contains("<dc:date>"));
        assert!(xml.contains("dcterms:modified"));
    }

    #[test]
    fn chapter_body_is_not_escaped() {
        let chapter = Chapter {
            path: "chapters/0001-a.xhtml".to_string(),
            title: "A <tricky> title".to_string(),
            body: "<p>Hello <em>world</em></p>".to_string(),
        };

        let xml = String::from_utf8(chapter_document("en", &chapter).unwrap()).unwrap();
        assert!(xml.contains("<body><p>Hello <em>world</em></p></body>"));
        assert!(xml.contains("<title>A &lt;tricky&gt; title</title>"));
        assert!(xml.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn nav_links_every_chapter() {
        let chapters = vec![
            Chapter {
                path: "chapters/0001-a.xhtml".to_string(),
                title: "A".to_string(),
                body: String::new(),
            },
            Chapter {
                path: "chapters/0002-b.xhtml".to_string(),
                title: "B".to_string(),
                body: String::new(),
            },
        ];

        let xml = String::from_utf8(navigation_document("Daily News", "en", &chapters).unwrap())
            .unwrap();
        assert!(xml.contains(r#"<a href="chapters/0001-a.xhtml">A</a>"#));
        assert!(xml.contains(r#"<a href="chapters/0002-b.xhtml">B</a>"#));
    }
}
