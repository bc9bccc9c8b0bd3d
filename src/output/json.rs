use crate::feed::Entry;

/// Serializes entries as a pretty-printed JSON array (2-space indent).
///
/// Non-ASCII text is written literally rather than `\u`-escaped.
pub fn render_json(entries: &[Entry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}
