//! Timecode parsing.
//!
//! Editing-tool exports use `HH:MM:SS:FF` (frames) or `HH:MM:SS.mmm`
//! (milliseconds). Manual entry uses plain seconds with a millisecond part.

use once_cell::sync::Lazy;
use regex::Regex;

/// Frame rate assumed for two-digit frame suffixes.
pub const TIMECODE_FPS: f64 = 30.0;

static TIMECODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{2}):([0-9]{2})(?:[:.]([0-9]{2,3}))?$")
        .expect("timecode pattern is valid")
});

/// Parse `HH:MM:SS[:.FF]` into milliseconds.
///
/// A two-digit suffix is a frame count at [`TIMECODE_FPS`]; a three-digit
/// suffix is milliseconds. The result is rounded to whole milliseconds.
///
/// Returns `None` if the input does not match the pattern.
pub fn parse_timecode_to_ms(timecode: &str) -> Option<f64> {
    let caps = TIMECODE_PATTERN.captures(timecode.trim())?;

    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    let total_seconds = hours * 3600.0 + minutes * 60.0 + seconds;

    let suffix_ms = match caps.get(4) {
        Some(suffix) => {
            let value: f64 = suffix.as_str().parse().ok()?;
            if suffix.as_str().len() == 2 {
                value / TIMECODE_FPS * 1000.0
            } else {
                value
            }
        }
        None => 0.0,
    };

    Some((total_seconds * 1000.0 + suffix_ms).round())
}

/// Parse a manual-entry time (`12.345` or `12:345`) into milliseconds.
///
/// The part after the separator is read as a millisecond count, so
/// `12.5` is 12005 ms. A bare number is seconds.
///
/// Returns `None` for empty or unparseable input.
pub fn parse_seconds_to_ms(time: &str) -> Option<f64> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }

    let normalized = time.replacen(':', ".", 1);
    let parts: Vec<&str> = normalized.split('.').collect();
    match parts.as_slice() {
        [seconds, millis] => {
            let seconds: f64 = seconds.parse().ok()?;
            let millis: f64 = millis.parse().ok()?;
            Some(seconds * 1000.0 + millis)
        }
        [seconds] => seconds.parse::<f64>().ok().map(|s| s * 1000.0),
        _ => None,
    }
}

/// Format milliseconds as `seconds.mmm`, e.g. `12.345` or `-0.050`.
pub fn format_ms_to_time(ms: f64) -> String {
    let total = ms.round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let magnitude = total.unsigned_abs();
    format!("{}{}.{:03}", sign, magnitude / 1000, magnitude % 1000)
}
