use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::feed::parser::{parse_feed, Entry};
use crate::feed::FeedError;
use crate::util::{validate_url, UrlValidationError};

/// Whole-request deadline: connect, headers and body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent when the config does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; rss-reader/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while retrieving a feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL failed validation before any request was made
    #[error("Invalid feed URL")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error {status}: {reason}")]
    HttpStatus { status: u16, reason: String },
    /// Request did not complete before the deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large (limit {} bytes)", MAX_FEED_SIZE)]
    ResponseTooLarge,
    /// Response body is not UTF-8 text
    #[error("Response body is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Builds the HTTP client used for the single feed request.
///
/// # Errors
///
/// Returns [`FetchError::Network`] if the TLS backend cannot be initialized.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(FetchError::Network)
}

/// Fetches a feed and returns at most `limit` entries in document order.
///
/// # Errors
///
/// - [`FeedError::Fetch`] for URL, network, status, timeout, size or
///   encoding failures
/// - [`FeedError::Xml`] if the body is not well-formed XML
/// - [`FeedError::UnknownFormat`] if the body is XML but not RSS or Atom
///
/// # Behavior
///
/// - One attempt, no retries
/// - The request (including the body) must finish within [`FETCH_TIMEOUT`]
/// - Bodies over 10MB are rejected
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    limit: usize,
) -> Result<Vec<Entry>, FeedError> {
    let text = fetch_text(client, url, FETCH_TIMEOUT).await?;

    let mut entries = parse_feed(&text)?;
    let total = entries.len();
    entries.truncate(limit);

    tracing::info!(
        url = %url,
        total = total,
        returned = entries.len(),
        "Fetched feed"
    );
    Ok(entries)
}

/// Retrieves `url` and decodes the body as UTF-8 text.
pub(crate) async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let url = validate_url(url)?;

    let bytes = tokio::time::timeout(timeout, download(client, url))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;

    let mut text = String::from_utf8(bytes)?;
    if text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }
    Ok(text)
}

async fn download(client: &reqwest::Client, url: Url) -> Result<Vec<u8>, FetchError> {
    tracing::debug!(url = %url, "Requesting feed");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = %status, "Feed request returned non-success status");
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
        });
    }

    read_limited_bytes(response, MAX_FEED_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
