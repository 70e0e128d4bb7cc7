//! Record time parsing and formatting.
//!
//! Record cells are typed by hand. The canonical format is
//! "1분 30초 12" (1 minute, 30 seconds, 12 centiseconds); a few fallback
//! formats are accepted so a stray "2:05.5" does not lose someone's record.
//! Parsing never fails hard: anything unreadable becomes "no record".

use std::sync::OnceLock;

use regex::Regex;

const CS_PER_MINUTE: i64 = 6_000;

/// "1분 30초 12": minutes, seconds, centiseconds.
fn re_min_sec_cs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*분\s*(\d+)\s*초\s*(\d+)\s*$").unwrap())
}

/// "2:05.5": colon-separated minutes and (possibly fractional) seconds.
fn re_colon() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*:\s*(\d+(?:\.\d+)?)\s*$").unwrap())
}

/// "3분 45.5초": unit markers without a trailing centisecond term.
fn re_min_sec() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*분\s*(\d+(?:\.\d+)?)\s*초\s*$").unwrap())
}

fn capture_num(caps: &regex::Captures<'_>, index: usize) -> Option<f64> {
    let value: f64 = caps.get(index)?.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a record cell into seconds. Empty or unreadable input is `None`.
///
/// Grammars are tried in fixed precedence order; the first match wins.
pub fn parse_record(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = re_min_sec_cs().captures(text) {
        if let (Some(min), Some(sec), Some(cs)) = (
            capture_num(&caps, 1),
            capture_num(&caps, 2),
            capture_num(&caps, 3),
        ) {
            return Some(min * 60.0 + sec + cs / 100.0);
        }
    }

    if let Some(caps) = re_colon().captures(text) {
        if let (Some(min), Some(sec)) = (capture_num(&caps, 1), capture_num(&caps, 2)) {
            return Some(min * 60.0 + sec);
        }
    }

    if let Some(caps) = re_min_sec().captures(text) {
        if let (Some(min), Some(sec)) = (capture_num(&caps, 1), capture_num(&caps, 2)) {
            return Some(min * 60.0 + sec);
        }
    }

    // Bare number of seconds, tolerating thousands separators.
    match text.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Format seconds as "X분 Y초 ZZ".
///
/// Rounds to whole centiseconds first so floating-point seconds do not
/// drift in display; the inverse of the canonical parse grammar.
pub fn format_seconds(total_seconds: f64) -> String {
    let mut total_cs = (total_seconds * 100.0).round() as i64;

    let mut minutes = total_cs / CS_PER_MINUTE;
    total_cs -= minutes * CS_PER_MINUTE;

    let mut seconds = total_cs / 100;
    total_cs -= seconds * 100;

    let mut cs = total_cs;

    // Carry correction; unreachable with the arithmetic above but cheap.
    if cs >= 100 {
        cs = 0;
        seconds += 1;
    }
    if seconds >= 60 {
        seconds = 0;
        minutes += 1;
    }

    format!("{minutes}분 {seconds}초 {cs:02}")
}
