//! Rendering of parsed entries for standard output.

mod json;
mod text;

use clap::ValueEnum;
use serde::Deserialize;

use crate::feed::Entry;

pub use json::render_json;
pub use text::{render_text, SUMMARY_MAX_CHARS};

/// Output format selected with `--format` or the `format` config key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Numbered, human-readable list
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

/// Renders entries in the requested format.
///
/// # Errors
///
/// Only JSON serialization can fail, and only for non-string map keys, which
/// [`Entry`] does not have.
pub fn render(entries: &[Entry], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(entries)),
        OutputFormat::Json => render_json(entries),
    }
}
