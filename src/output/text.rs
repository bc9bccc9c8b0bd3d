use crate::feed::Entry;
use crate::util::{strip_control_chars, truncate_chars};

/// Summaries longer than this many characters are cut and get `...` appended.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Renders entries as a numbered list separated by blank lines.
///
/// ```text
/// 1. Title
///    Published: 2024-10-02T15:00:00+00:00
///    Author: Jane
///    Link: https://example.com/1
///    First 200 characters of the summary...
///
/// ```
///
/// `Published`, `Author` and the summary line are omitted when empty. Control
/// characters are stripped from every field before printing.
pub fn render_text(entries: &[Entry]) -> String {
    let mut lines = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, strip_control_chars(&entry.title)));

        if let Some(published) = entry.published.as_deref().filter(|p| !p.is_empty()) {
            lines.push(format!("   Published: {}", strip_control_chars(published)));
        }
        if !entry.author.is_empty() {
            lines.push(format!("   Author: {}", strip_control_chars(&entry.author)));
        }
        lines.push(format!("   Link: {}", strip_control_chars(&entry.link)));

        if !entry.summary.is_empty() {
            let summary = strip_control_chars(&entry.summary);
            lines.push(format!("   {}", truncate_chars(&summary, SUMMARY_MAX_CHARS)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
