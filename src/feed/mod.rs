//! Feed retrieval and parsing for RSS 2.0 and Atom.
//!
//! - **Fetching**: a single HTTP GET with a fixed timeout and body size cap
//! - **Tree**: a namespace-resolved element tree over `quick-xml`
//! - **Detection**: root element → [`FeedKind`]
//! - **Parsing**: per-kind field mapping into uniform [`Entry`] records
//! - **Dates**: best-effort normalization to ISO 8601
//!
//! # Example
//!
//! ```ignore
//! use rss_reader::feed::{build_client, fetch_feed, DEFAULT_USER_AGENT};
//!
//! let client = build_client(DEFAULT_USER_AGENT)?;
//! let entries = fetch_feed(&client, "https://example.com/feed.xml", 10).await?;
//! ```

mod date;
mod detect;
mod fetcher;
mod parser;
mod tree;

use thiserror::Error;

pub use date::normalize_date;
pub use detect::{detect, FeedKind, ATOM_NS, DC_NS};
pub use fetcher::{build_client, fetch_feed, FetchError, DEFAULT_USER_AGENT, FETCH_TIMEOUT};
pub use parser::{extract_entries, parse_feed, Entry};
pub use tree::{parse_document, Element, XmlError};

/// Errors that end a feed read.
///
/// Missing fields inside a well-formed feed are never errors; only these are.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The response body is not well-formed XML.
    #[error("Failed to parse XML")]
    Xml(#[from] XmlError),
    /// The root element is neither RSS nor Atom. Carries the root tag.
    #[error("Unknown feed format: {0}")]
    UnknownFormat(String),
}
