use std::fmt;

use super::tree::Element;
use super::FeedError;

/// Atom namespace URI (RFC 4287).
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Dublin Core elements namespace, used by RSS feeds for `dc:creator`.
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Feed schema selected from the document's root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// `<rss>` → `<channel>` → `<item>`
    Rss,
    /// `<feed xmlns="http://www.w3.org/2005/Atom">` → `<entry>`
    AtomNs,
    /// `<feed>` → `<entry>` with no namespace declared
    AtomBare,
}

impl FeedKind {
    /// Namespace that Atom entry children are looked up in. RSS children use
    /// the root element's own namespace instead.
    pub fn namespace(self) -> Option<&'static str> {
        match self {
            FeedKind::Rss | FeedKind::AtomBare => None,
            FeedKind::AtomNs => Some(ATOM_NS),
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedKind::Rss => "rss",
            FeedKind::AtomNs => "atom",
            FeedKind::AtomBare => "atom (no namespace)",
        };
        f.write_str(name)
    }
}

/// Classifies a document by its root element.
///
/// # Errors
///
/// Returns [`FeedError::UnknownFormat`] carrying the root tag in Clark
/// notation (`{uri}local`, or `local` when un-namespaced).
pub fn detect(root: &Element) -> Result<FeedKind, FeedError> {
    match (root.namespace(), root.local_name()) {
        (_, "rss") => Ok(FeedKind::Rss),
        (Some(ATOM_NS), "feed") => Ok(FeedKind::AtomNs),
        (None, "feed") => Ok(FeedKind::AtomBare),
        _ => Err(FeedError::UnknownFormat(root.tag())),
    }
}
