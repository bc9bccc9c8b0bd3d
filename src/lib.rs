//! Fetch a single RSS 2.0 or Atom feed and render its entries as text or JSON.
//!
//! The work happens in [`feed`]: retrieval, format detection, entry
//! extraction and date normalization. [`output`] renders the result, and
//! [`cli`] with [`config`] decide limit, format and user agent.

pub mod cli;
pub mod config;
pub mod feed;
pub mod output;
pub mod util;
