use serde::Serialize;

use super::date::normalize_date;
use super::detect::{detect, FeedKind, DC_NS};
use super::tree::{parse_document, Element};
use super::FeedError;

/// A feed item or entry, normalized across RSS and Atom.
///
/// Every field is always present when serialized. Text fields fall back to
/// an empty string; `published` is `None` only when the source had no date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// ISO 8601 timestamp when the source date was recognized, otherwise the
    /// source text verbatim.
    pub published: Option<String>,
    pub summary: String,
    pub author: String,
}

/// Parses a feed document into entries, in document order.
///
/// No limit is applied here; callers truncate afterwards.
///
/// # Errors
///
/// - [`FeedError::Xml`] if the text is not well-formed XML
/// - [`FeedError::UnknownFormat`] if the root is neither RSS nor Atom
pub fn parse_feed(text: &str) -> Result<Vec<Entry>, FeedError> {
    let root = parse_document(text)?;
    let kind = detect(&root)?;
    let entries = extract_entries(kind, &root);

    tracing::debug!(kind = %kind, entries = entries.len(), "Parsed feed");
    Ok(entries)
}

/// Builds one [`Entry`] per item/entry element under `root`.
///
/// Missing optional elements degrade to empty values; this never fails.
pub fn extract_entries(kind: FeedKind, root: &Element) -> Vec<Entry> {
    match kind {
        FeedKind::Rss => extract_rss(root, root.namespace()),
        FeedKind::AtomNs | FeedKind::AtomBare => extract_atom(root, kind.namespace()),
    }
}

/// Returns `primary` unless it is empty, in which case `fallback` is evaluated.
fn non_empty_or<'a>(primary: &'a str, fallback: impl FnOnce() -> &'a str) -> &'a str {
    if primary.is_empty() {
        fallback()
    } else {
        primary
    }
}

/// RSS children live in the root's namespace, which is `None` for the usual
/// un-namespaced `<rss>`.
fn extract_rss(root: &Element, ns: Option<&str>) -> Vec<Entry> {
    let Some(channel) = root.find(ns, "channel") else {
        tracing::debug!("RSS document has no <channel>");
        return Vec::new();
    };

    channel
        .find_all(ns, "item")
        .map(|item| Entry {
            title: item.find_text(ns, "title").to_owned(),
            link: item.find_text(ns, "link").to_owned(),
            published: normalize_date(Some(item.find_text(ns, "pubDate"))),
            summary: item.find_text(ns, "description").to_owned(),
            author: non_empty_or(item.find_text(ns, "author"), || {
                item.find_text(Some(DC_NS), "creator")
            })
            .to_owned(),
        })
        .collect()
}

fn extract_atom(root: &Element, ns: Option<&str>) -> Vec<Entry> {
    root.find_all(ns, "entry")
        .map(|entry| {
            let published = non_empty_or(entry.find_text(ns, "published"), || {
                entry.find_text(ns, "updated")
            });
            let summary = non_empty_or(entry.find_text(ns, "summary"), || {
                entry.find_text(ns, "content")
            });
            let author = entry
                .find_all(ns, "author")
                .find_map(|a| a.find(ns, "name"))
                .map(|name| name.text().trim())
                .unwrap_or("");

            Entry {
                title: entry.find_text(ns, "title").to_owned(),
                link: atom_link(entry, ns),
                published: normalize_date(Some(published)),
                summary: summary.to_owned(),
                author: author.to_owned(),
            }
        })
        .collect()
}

/// `href` of the `rel="alternate"` link, else of the first link, else empty.
fn atom_link(entry: &Element, ns: Option<&str>) -> String {
    entry
        .find_all(ns, "link")
        .find(|link| link.attr("rel") == Some("alternate"))
        .or_else(|| entry.find(ns, "link"))
        .and_then(|link| link.attr("href"))
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RSS_THREE_ITEMS: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Example</title>
    <item>
      <title>First</title>
      <link>https://example.com/1</link>
      <pubDate>Wed, 02 Oct 2024 15:00:00 +0000</pubDate>
      <description>One</description>
      <author>alice@example.com</author>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/2</link>
      <dc:creator>Bob</dc:creator>
    </item>
    <item>
      <title>  Third  </title>
      <pubDate>sometime last week</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_rss_items_in_order() {
        let entries = parse_feed(RSS_THREE_ITEMS).unwrap();
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_rss_field_mapping() {
        let entries = parse_feed(RSS_THREE_ITEMS).unwrap();

        assert_eq!(
            entries[0],
            Entry {
                title: "First".into(),
                link: "https://example.com/1".into(),
                published: Some("2024-10-02T15:00:00+00:00".into()),
                summary: "One".into(),
                author: "alice@example.com".into(),
            }
        );
    }

    #[test]
    fn test_rss_author_falls_back_to_dc_creator() {
        let entries = parse_feed(RSS_THREE_ITEMS).unwrap();
        assert_eq!(entries[1].author, "Bob");
    }

    #[test]
    fn test_rss_missing_fields_are_empty() {
        let entries = parse_feed(RSS_THREE_ITEMS).unwrap();

        assert_eq!(entries[1].published, None);
        assert_eq!(entries[1].summary, "");
        assert_eq!(entries[2].link, "");
        assert_eq!(entries[2].author, "");
        assert_eq!(entries[2].published.as_deref(), Some("sometime last week"));
    }

    #[test]
    fn test_rss_without_channel_is_empty() {
        let entries = parse_feed("<rss version=\"2.0\"><item><title>x</title></item></rss>")
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_namespaced_rss_items_are_found() {
        let doc = r#"<rss xmlns="http://example.com/ns" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <item><title>A</title><link>http://x/a</link><dc:creator>Ann</dc:creator></item>
    <item><title>B</title><pubDate>2024-10-02</pubDate></item>
  </channel>
</rss>"#;
        let entries = parse_feed(doc).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[0].link, "http://x/a");
        assert_eq!(entries[0].author, "Ann");
        assert_eq!(entries[1].title, "B");
        assert_eq!(entries[1].published.as_deref(), Some("2024-10-02T00:00:00"));
    }

    #[test]
    fn test_rss_empty_channel() {
        let entries = parse_feed("<rss><channel></channel></rss>").unwrap();
        assert!(entries.is_empty());
    }

    const ATOM_NS_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <entry>
    <title>Atom One</title>
    <link href="https://example.com/related"/>
    <link rel="alternate" href="https://example.com/a1"/>
    <published>2024-10-02T15:00:00Z</published>
    <updated>2024-10-03T09:00:00Z</updated>
    <summary>Short summary</summary>
    <content>Long content</content>
    <author><name>Carol</name><email>carol@example.com</email></author>
  </entry>
  <entry>
    <title>Atom Two</title>
    <link rel="self" href="https://example.com/a2.xml"/>
    <updated>2024-10-03T09:00:00+02:00</updated>
    <content type="html">Only content</content>
  </entry>
  <entry>
    <title>Atom Three</title>
  </entry>
</feed>"#;

    #[test]
    fn test_atom_alternate_link_preferred() {
        let entries = parse_feed(ATOM_NS_FEED).unwrap();
        assert_eq!(entries[0].link, "https://example.com/a1");
    }

    #[test]
    fn test_atom_link_falls_back_to_first_link() {
        let entries = parse_feed(ATOM_NS_FEED).unwrap();
        assert_eq!(entries[1].link, "https://example.com/a2.xml");
        assert_eq!(entries[2].link, "");
    }

    #[test]
    fn test_atom_published_falls_back_to_updated() {
        let entries = parse_feed(ATOM_NS_FEED).unwrap();
        assert_eq!(
            entries[0].published.as_deref(),
            Some("2024-10-02T15:00:00+00:00")
        );
        assert_eq!(
            entries[1].published.as_deref(),
            Some("2024-10-03T09:00:00+02:00")
        );
        assert_eq!(entries[2].published, None);
    }

    #[test]
    fn test_atom_summary_falls_back_to_content() {
        let entries = parse_feed(ATOM_NS_FEED).unwrap();
        assert_eq!(entries[0].summary, "Short summary");
        assert_eq!(entries[1].summary, "Only content");
    }

    #[test]
    fn test_atom_author_name() {
        let entries = parse_feed(ATOM_NS_FEED).unwrap();
        assert_eq!(entries[0].author, "Carol");
        assert_eq!(entries[1].author, "");
    }

    #[test]
    fn test_bare_atom_uses_same_mapping() {
        let doc = r#"<feed>
  <entry>
    <title>Bare</title>
    <link href="https://example.com/other"/>
    <link rel="alternate" href="https://example.com/bare"/>
    <updated>2024-10-02</updated>
    <summary>S</summary>
    <author><name>Dan</name></author>
  </entry>
</feed>"#;
        let entries = parse_feed(doc).unwrap();

        assert_eq!(
            entries,
            vec![Entry {
                title: "Bare".into(),
                link: "https://example.com/bare".into(),
                published: Some("2024-10-02T00:00:00".into()),
                summary: "S".into(),
                author: "Dan".into(),
            }]
        );
    }

    #[test]
    fn test_namespaced_atom_ignores_unnamespaced_entries() {
        let doc = r#"<a:feed xmlns:a="http://www.w3.org/2005/Atom"><entry><title>x</title></entry></a:feed>"#;
        assert!(parse_feed(doc).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_format_error() {
        let err = parse_feed("<opml version=\"2.0\"/>").unwrap_err();
        assert!(matches!(err, FeedError::UnknownFormat(ref tag) if tag == "opml"));
        assert_eq!(err.to_string(), "Unknown feed format: opml");
    }

    #[test]
    fn test_malformed_xml_error() {
        let err = parse_feed("<rss><channel>").unwrap_err();
        assert!(matches!(err, FeedError::Xml(_)));
        assert_eq!(err.to_string(), "Failed to parse XML");
    }

    #[test]
    fn test_entry_serializes_all_keys() {
        let entry = Entry {
            title: "T".into(),
            link: String::new(),
            published: None,
            summary: String::new(),
            author: String::new(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "T",
                "link": "",
                "published": null,
                "summary": "",
                "author": ""
            })
        );
    }
}
