//! Duration normalization for display.
//!
//! Timing feeds hand out durations in several shapes: plain seconds, composite
//! `"0 days 01:31:44.742000"` strings, already formatted `"+5.123"` gaps. Everything that
//! ends up in a payload goes through [`normalize`], which produces one display convention:
//!
//! | input                      | mode    | gap   | output         |
//! |----------------------------|---------|-------|----------------|
//! | `0 days 00:01:23.456789`   | Total   | no    | `0:01:23.456`  |
//! | `0 days 00:01:23.456789`   | Total   | yes   | `+0:01:23.456` |
//! | `0:01:23.456`              | Lap     | -     | `1:23.456`     |
//! | `1:02:03.456`              | Lap     | -     | `02:03.456`    |
//! | `NaT` / missing            | any     | any   | `None`         |
//!
//! Fractional seconds are truncated to milliseconds, never rounded and never padded.

use serde::{Deserialize, Serialize};

const ABSENT_TOKENS: &[&str] = &["nat", "nan", "none", "null", "n/a"];
const MICROS_PER_SECOND: f64 = 1_000_000.0;
const MICROS_PER_DAY: u64 = 86_400 * 1_000_000;

/// Formatting rules applied by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationMode {
    /// Race totals and gaps: `H:MM:SS.fff`, gaps prefixed with `+`.
    Total,
    /// Lap and qualifying segment times: `m:ss.fff`.
    Lap,
    /// Unknown mode: day prefix stripped and fraction truncated, nothing else.
    Passthrough,
}

impl From<&str> for DurationMode {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "total" => DurationMode::Total,
            "lap" => DurationMode::Lap,
            _ => DurationMode::Passthrough,
        }
    }
}

/// Normalize a raw duration string into its display form.
///
/// Returns `None` for absent input and for the `NaT`/`NaN` markers timing libraries use for
/// missing values. A `+` already present on the input is kept; in [`DurationMode::Total`]
/// one is added when `is_gap` is set, so normalizing twice yields the same string.
pub fn normalize(raw: Option<&str>, is_gap: bool, mode: DurationMode) -> Option<String> {
    let raw = raw?.trim();
    if is_absent_token(raw) {
        return None;
    }

    let (sign, body) = match raw.strip_prefix('+') {
        Some(rest) => ("+", rest.trim_start()),
        None => ("", raw),
    };

    let clock = truncate_fraction(strip_day_prefix(body));
    if clock.is_empty() {
        return None;
    }

    let formatted = match mode {
        DurationMode::Total => unpad_hours(&clock),
        DurationMode::Lap => lap_clock(&clock),
        DurationMode::Passthrough => clock,
    };

    let sign = if sign.is_empty() && is_gap && mode == DurationMode::Total { "+" } else { sign };
    Some(format!("{sign}{formatted}"))
}

/// Normalize a duration given in seconds.
pub fn normalize_seconds(seconds: Option<f64>, is_gap: bool, mode: DurationMode) -> Option<String> {
    let text = seconds.and_then(timedelta_text)?;
    normalize(Some(&text), is_gap, mode)
}

/// Map non-finite values to `None` so they never reach a payload.
pub fn safe_seconds(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Round seconds to millisecond precision.
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Render seconds in the composite `"D days HH:MM:SS.ffffff"` form timing libraries emit.
///
/// Negative and non-finite values have no display form and yield `None`.
pub fn timedelta_text(seconds: f64) -> Option<String> {
    let seconds = safe_seconds(seconds).filter(|s| *s >= 0.0)?;
    let micros = (seconds * MICROS_PER_SECOND).round() as u64;

    let days = micros / MICROS_PER_DAY;
    let rem = micros % MICROS_PER_DAY;
    let hours = rem / 3_600_000_000;
    let minutes = rem % 3_600_000_000 / 60_000_000;
    let secs = rem % 60_000_000 / 1_000_000;
    let fraction = rem % 1_000_000;

    Some(if fraction == 0 {
        format!("{days} days {hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{days} days {hours:02}:{minutes:02}:{secs:02}.{fraction:06}")
    })
}

/// Parse a duration string (composite, clock or plain seconds) back into seconds.
pub fn parse_timedelta(text: &str) -> Option<f64> {
    let text = text.trim();
    if is_absent_token(text) {
        return None;
    }
    let text = text.strip_prefix('+').unwrap_or(text).trim_start();

    let (days, clock) = match text.rsplit_once(' ') {
        Some((prefix, clock)) if prefix.contains("day") => {
            let days: f64 = prefix.split_whitespace().next()?.parse().ok()?;
            (days, clock)
        }
        _ => (0.0, text),
    };

    let mut total = 0.0;
    for part in clock.split(':') {
        let value: f64 = part.parse().ok()?;
        total = total * 60.0 + value;
    }

    safe_seconds(days * 86_400.0 + total)
}

/// A duration as delivered by a session provider: either seconds or preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(f64),
    Text(String),
}

impl RawDuration {
    /// Value in seconds, if it is a real, finite duration.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            RawDuration::Seconds(value) => safe_seconds(*value),
            RawDuration::Text(text) => parse_timedelta(text),
        }
    }

    /// Display form of this duration.
    pub fn normalized(&self, is_gap: bool, mode: DurationMode) -> Option<String> {
        match self {
            RawDuration::Seconds(value) => normalize_seconds(Some(*value), is_gap, mode),
            RawDuration::Text(text) => normalize(Some(text), is_gap, mode),
        }
    }
}

impl From<f64> for RawDuration {
    fn from(value: f64) -> Self {
        RawDuration::Seconds(value)
    }
}

fn is_absent_token(text: &str) -> bool {
    text.is_empty() || ABSENT_TOKENS.iter().any(|token| text.eq_ignore_ascii_case(token))
}

fn strip_day_prefix(text: &str) -> &str {
    match text.rsplit_once(' ') {
        Some((prefix, clock)) if prefix.contains("day") => clock,
        _ => text,
    }
}

fn truncate_fraction(clock: &str) -> String {
    match clock.split_once('.') {
        Some((whole, "")) => whole.to_string(),
        Some((whole, fraction)) => {
            let millis: String = fraction.chars().take(3).collect();
            format!("{whole}.{millis}")
        }
        None => clock.to_string(),
    }
}

fn unpad_hours(clock: &str) -> String {
    let parts: Vec<&str> = clock.split(':').collect();
    match parts.as_slice() {
        [hours, minutes, seconds] => match hours.parse::<u64>() {
            Ok(hours) => format!("{hours}:{minutes}:{seconds}"),
            Err(_) => clock.to_string(),
        },
        _ => clock.to_string(),
    }
}

fn lap_clock(clock: &str) -> String {
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() <= 2 {
        return clock.to_string();
    }

    let (dropped, kept) = parts.split_at(parts.len() - 2);
    let all_zero = dropped.iter().all(|p| !p.is_empty() && p.chars().all(|c| c == '0'));

    match (all_zero, kept[0].parse::<u64>()) {
        (true, Ok(minutes)) => format!("{minutes}:{}", kept[1]),
        _ => kept.join(":"),
    }
}
