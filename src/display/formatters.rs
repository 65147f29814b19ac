//! Leaf formatters turning raw payload fields into display strings.

use std::sync::LazyLock;

use owo_colors::{OwoColorize, Stream};
use regex::Regex;

/// Placeholder for missing values
pub const MISSING: &str = "-";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex should compile"));

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/li|/tr|/h[1-6])\s*/?\s*>")
        .expect("block tag regex should compile")
});

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line regex should compile"));

/// Format a duration in minutes as `45m`, `3h 5m` or `2d 4h`.
///
/// ```
/// use deskwatch::display::fmt_minutes;
///
/// assert_eq!(fmt_minutes(Some(45)), "45m");
/// assert_eq!(fmt_minutes(Some(185)), "3h 5m");
/// assert_eq!(fmt_minutes(Some(3120)), "2d 4h");
/// assert_eq!(fmt_minutes(None), "-");
/// ```
pub fn fmt_minutes(value: Option<i64>) -> String {
    let Some(total) = value else {
        return MISSING.to_string();
    };
    if total < 60 {
        return format!("{total}m");
    }
    let hours = total / 60;
    let mins = total % 60;
    if hours < 24 {
        return format!("{hours}h {mins}m");
    }
    format!("{}d {}h", hours / 24, hours % 24)
}

/// Format fractional hours with one decimal, e.g. `12.3h`
pub fn fmt_hours(value: Option<f64>) -> String {
    match value {
        Some(hours) if hours.is_finite() => format!("{hours:.1}h"),
        _ => MISSING.to_string(),
    }
}

/// Format a backend ISO timestamp as `YYYY-MM-DD HH:MM:SS UTC`
///
/// ```
/// use deskwatch::display::fmt_timestamp;
///
/// assert_eq!(fmt_timestamp(Some("2025-03-01T09:15:00+00:00")), "2025-03-01 09:15:00 UTC");
/// assert_eq!(fmt_timestamp(Some("")), "-");
/// ```
pub fn fmt_timestamp(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(ts) if !ts.is_empty() => ts.replacen('T', " ", 1).replace("+00:00", " UTC"),
        _ => MISSING.to_string(),
    }
}

/// Use `value` unless it is missing or blank
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => sanitize(v),
        _ => MISSING.to_string(),
    }
}

/// `Name (CODE)` label used for desks, agents, clients and intents
pub fn labelled(name: Option<&str>, code: Option<&str>) -> String {
    format!("{} ({})", or_dash(name), or_dash(code))
}

/// Drop terminal control sequences from untrusted text. Newlines and tabs
/// become plain spaces so a field can never break the surrounding layout.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Flatten a rich-text (HTML) message body to plain text.
///
/// Bodies without markup are returned unchanged apart from control characters.
pub fn to_plain_text(value: &str) -> String {
    if !(value.contains('<') && value.contains('>')) {
        return strip_controls(value);
    }
    let with_breaks = BLOCK_TAG_RE.replace_all(value, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);
    let collapsed = BLANK_LINES_RE.replace_all(&decoded, "\n\n");
    strip_controls(collapsed.trim())
}

fn strip_controls(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// `YES`/`NO` badge for boolean flags
pub fn yes_no(flag: bool) -> String {
    if flag {
        "YES"
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    } else {
        "NO"
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }
}

/// Ticket status badge, colored by lifecycle stage
pub fn status_badge(status: &str) -> String {
    let text = sanitize(status);
    match text.to_uppercase().as_str() {
        "OPEN" => text
            .if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string(),
        "IN_PROGRESS" => text
            .if_supports_color(Stream::Stdout, |t| t.blue())
            .to_string(),
        "WAITING_CLIENT" => text
            .if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string(),
        "ESCALATED" => text
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
        "RESOLVED" => text
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        "CLOSED" => text
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string(),
        _ => text,
    }
}

/// Load ratio as a whole percentage clamped to 0..=100
pub fn load_pct(load_ratio: f64) -> u8 {
    if !load_ratio.is_finite() {
        return 0;
    }
    (load_ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Threshold at which an agent is flagged as overloaded
pub const HOT_LOAD_PCT: u8 = 80;

/// Fixed-width text gauge for a percentage, e.g. `[#####-----]`
pub fn load_bar(pct: u8, width: usize) -> String {
    let filled = (usize::from(pct.min(100)) * width).div_ceil(100);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Section heading for the terminal dashboard
pub fn heading(title: &str) -> String {
    title
        .if_supports_color(Stream::Stdout, |t| t.bold())
        .to_string()
}

/// Secondary text
pub fn muted(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.dimmed())
        .to_string()
}
