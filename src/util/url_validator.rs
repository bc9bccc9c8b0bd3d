use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("could not parse URL")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host to connect to.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL string for use as a feed source.
///
/// The URL comes straight from the command line, so local and private hosts
/// are allowed; only the scheme and the presence of a host are checked.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidUrl`] if the URL cannot be parsed
/// - [`UrlValidationError::UnsupportedScheme`] for anything but `http`/`https`
/// - [`UrlValidationError::MissingHost`] if there is no host
///
/// # Examples
///
/// ```
/// use rss_reader::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
        assert!(validate_url("http://news.example.org").is_ok());
        assert!(validate_url("https://example.com:8443/rss?x=1").is_ok());
    }

    #[test]
    fn test_local_hosts_allowed() {
        assert!(validate_url("http://localhost:8080/feed").is_ok());
        assert!(validate_url("http://127.0.0.1/feed").is_ok());
        assert!(validate_url("http://[::1]/feed").is_ok());
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(s)) if s == "file"
        ));
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_unparseable() {
        assert!(matches!(
            validate_url("example.com/feed"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let url = validate_url("  https://example.com/feed \n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/feed");
    }
}
