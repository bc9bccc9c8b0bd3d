//! Best-effort normalization of feed date strings to ISO 8601.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Weekday};

type DateParser = fn(&str) -> Option<String>;

/// Tried in order; the first parser that accepts the input wins.
const PARSERS: &[DateParser] = &[
    parse_rfc822_numeric_offset,
    parse_rfc822_named_zone,
    parse_iso8601_offset,
    parse_iso8601_zulu,
    parse_space_separated,
    parse_date_only,
];

/// Normalizes a raw feed date to an ISO 8601 timestamp.
///
/// Accepted inputs, in order of precedence:
///
/// 1. `Wed, 02 Oct 2024 15:00:00 +0000` (RFC 822, numeric offset)
/// 2. `Wed, 02 Oct 2024 15:00:00 GMT` (RFC 822, zone abbreviation)
/// 3. `2024-10-02T15:00:00+02:00` (ISO 8601, numeric offset)
/// 4. `2024-10-02T15:00:00Z` (ISO 8601, UTC)
/// 5. `2024-10-02 15:00:00` (no zone)
/// 6. `2024-10-02` (date only, rendered at midnight)
///
/// Inputs that carry an offset keep it (`2024-10-02T15:00:00+00:00`);
/// inputs without one stay naive (`2024-10-02T15:00:00`).
///
/// # Returns
///
/// - `None` for a missing or empty input
/// - the normalized timestamp when a format matches
/// - the input unchanged when nothing matches
pub fn normalize_date(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let trimmed = raw.trim();

    let normalized = PARSERS.iter().find_map(|parse| parse(trimmed));
    if normalized.is_none() {
        tracing::debug!(date = %raw, "Unrecognized date format, passing through");
    }
    Some(normalized.unwrap_or_else(|| raw.to_owned()))
}

fn format_with_offset(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn format_naive(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn with_offset(dt: NaiveDateTime, offset_secs: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(offset_secs)?;
    dt.and_local_timezone(offset).single().map(format_with_offset)
}

/// Drops a leading `Wed, ` / `Wednesday, `. The name is checked but not
/// matched against the date, since feeds often get it wrong.
fn strip_weekday(s: &str) -> Option<&str> {
    let (day, rest) = s.split_once(',')?;
    day.trim().parse::<Weekday>().ok()?;
    Some(rest.trim_start())
}

fn parse_rfc822_numeric_offset(s: &str) -> Option<String> {
    let rest = strip_weekday(s)?;
    DateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S %z")
        .ok()
        .map(format_with_offset)
}

fn parse_rfc822_named_zone(s: &str) -> Option<String> {
    let rest = strip_weekday(s)?;
    let (stamp, zone) = rest.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(stamp.trim_end(), "%d %b %Y %H:%M:%S").ok()?;

    match named_zone_offset(zone) {
        Some(hours) => with_offset(naive, hours * 3600),
        // Unknown abbreviation: keep the wall-clock time without guessing a zone
        None => Some(format_naive(naive)),
    }
}

/// Offsets (in hours) for the zone names RFC 822 defines.
fn named_zone_offset(zone: &str) -> Option<i32> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "UT" | "UTC" | "GMT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => return None,
    };
    Some(hours)
}

fn parse_iso8601_offset(s: &str) -> Option<String> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%:z"))
        .ok()
        .map(format_with_offset)
}

fn parse_iso8601_zulu(s: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ").ok()?;
    with_offset(naive, 0)
}

fn parse_space_separated(s: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(format_naive)
}

fn parse_date_only(s: &str) -> Option<String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(format_naive)
}
