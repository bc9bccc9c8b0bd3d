use std::borrow::Cow;

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";

/// Truncates a string to at most `max_chars` Unicode scalar values.
///
/// If truncation is necessary, `"..."` is appended after the kept prefix, so
/// the result can be up to `max_chars + 3` characters long. Strings that fit
/// are returned borrowed.
///
/// # Examples
///
/// ```
/// use rss_reader::util::truncate_chars;
///
/// assert_eq!(truncate_chars("Short", 10), "Short");
/// assert_eq!(truncate_chars("Hello World", 5), "Hello...");
/// assert_eq!(truncate_chars("日本語テキスト", 3), "日本語...");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS)),
        None => Cow::Borrowed(s),
    }
}

fn is_stripped_control(c: char) -> bool {
    c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')
}

/// Strips terminal control characters and ANSI escape sequences from text.
///
/// Feed titles and summaries are attacker-controlled; printed raw they could
/// recolor the terminal, move the cursor or set the window title.
///
/// Strips:
/// - ASCII control chars other than tab, newline and carriage return, and DEL
/// - CSI sequences: `ESC [` … final byte in `0x40..=0x7E`
/// - OSC sequences: `ESC ]` … terminated by BEL or `ESC \`
/// - a bare ESC
///
/// Returns `Cow::Borrowed` when there is nothing to strip.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_stripped_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}
