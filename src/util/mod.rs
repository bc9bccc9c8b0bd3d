//! Utility functions for common operations.
//!
//! - **URL validation**: scheme and host checks before a request is made
//! - **Text processing**: character-count truncation and terminal sanitizing
//!
//! # Examples
//!
//! ```
//! use rss_reader::util::{strip_control_chars, truncate_chars, validate_url};
//!
//! let url = validate_url("https://example.com/feed.xml").unwrap();
//! let summary = truncate_chars("A long article summary", 6);
//! let safe = strip_control_chars("\x1b[31mred\x1b[0m");
//! ```

mod text;
mod url_validator;

pub use text::{strip_control_chars, truncate_chars};
pub use url_validator::{validate_url, UrlValidationError};
