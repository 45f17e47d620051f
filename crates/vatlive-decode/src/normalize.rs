//! Field normalisers for the string encodings the upstream feed uses.
//!
//! Timestamps and HHMM durations are strict and return `Err` on bad input.
//! Altitudes, speeds and departure times are best-effort: anything that does
//! not parse comes back as [`Lenient::Raw`] with the original text.

use std::{str::FromStr, sync::OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use regex::Regex;
use vatlive_core::{Error, Lenient, Result};

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
/// Applied to the first 26 characters only, which drops a trailing `Z` and
/// any fractional digits past the sixth.
const TRUNCATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TRUNCATED_LEN: usize = 26;

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Parse an upstream UTC timestamp.
///
/// Tries `YYYY-MM-DDTHH:MM:SSZ`, then the same with fractional seconds, then
/// a fractional form without the `Z` on the text truncated to 26 characters.
/// The first format that matches wins.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
  let truncated = text.get(..TRUNCATED_LEN).unwrap_or(text);
  [
    (text, SECONDS_FORMAT),
    (text, FRACTIONAL_FORMAT),
    (truncated, TRUNCATED_FORMAT),
  ]
  .into_iter()
  .find_map(|(s, format)| NaiveDateTime::parse_from_str(s, format).ok())
  .map(|dt| dt.and_utc())
  .ok_or_else(|| Error::MalformedTimestamp(text.to_owned()))
}

// ─── Best-effort numerics ────────────────────────────────────────────────────

fn flight_level_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^FL([0-9]+)").expect("valid regex"))
}

/// Normalise a filed altitude to feet.
///
/// `"34100"` is feet as-is; `"FL350"` is a flight level and becomes 35000.
/// Anything else is kept verbatim.
pub fn normalize_altitude(text: &str) -> Lenient<i64> {
  let trimmed = text.trim();
  if let Ok(feet) = trimmed.parse::<i64>() {
    return Lenient::Parsed(feet);
  }
  flight_level_pattern()
    .captures(trimmed)
    .and_then(|caps| caps[1].parse::<i64>().ok())
    .and_then(|level| level.checked_mul(100))
    .map_or_else(|| Lenient::Raw(text.to_owned()), Lenient::Parsed)
}

/// Parse an integer field the feed sometimes sends as a string.
pub fn normalize_integer<T: FromStr>(text: &str) -> Lenient<T> {
  text
    .trim()
    .parse()
    .map_or_else(|_| Lenient::Raw(text.to_owned()), Lenient::Parsed)
}

// ─── HHMM fields ─────────────────────────────────────────────────────────────

/// Split `HHMM` into its two numeric halves.
fn split_hhmm(text: &str) -> Option<(u32, u32)> {
  if !text.is_char_boundary(2) || text.len() < 3 {
    return None;
  }
  let (hours, minutes) = text.split_at(2);
  Some((hours.parse().ok()?, minutes.parse().ok()?))
}

/// Interpret a packed `HHMM` string as a duration (`"0311"` → 3h11m).
///
/// The feed always sends these well-formed, so bad input is an error rather
/// than a fallback.
pub fn normalize_duration(text: &str) -> Result<TimeDelta> {
  let (hours, minutes) =
    split_hhmm(text).ok_or_else(|| Error::MalformedDuration(text.to_owned()))?;
  Ok(TimeDelta::hours(i64::from(hours)) + TimeDelta::minutes(i64::from(minutes)))
}

/// Anchor a filed `HHMM` departure time to today's UTC date.
///
/// Never rolls forward to tomorrow, even when the time of day has already
/// passed.
pub fn normalize_deptime(text: &str) -> Lenient<DateTime<Utc>> {
  normalize_deptime_on(text, Utc::now().date_naive())
}

/// [`normalize_deptime`] against an explicit date.
pub fn normalize_deptime_on(text: &str, date: NaiveDate) -> Lenient<DateTime<Utc>> {
  split_hhmm(text)
    .and_then(|(hours, minutes)| NaiveTime::from_hms_opt(hours, minutes, 0))
    .map_or_else(
      || Lenient::Raw(text.to_owned()),
      |time| Lenient::Parsed(date.and_time(time).and_utc()),
    )
}

#[cfg(test)]
mod tests {
  use chrono::{Datelike, Timelike};

  use super::*;

  // ── Timestamps ──────────────────────────────────────────────────────────

  #[test]
  fn timestamp_without_fraction() {
    let ts = parse_timestamp("2023-04-11T16:13:43Z").unwrap();
    assert_eq!((ts.hour(), ts.minute(), ts.second()), (16, 13, 43));
    assert_eq!(ts.nanosecond(), 0);
  }

  #[test]
  fn timestamp_with_seven_fractional_digits() {
    let ts = parse_timestamp("2023-04-11T16:13:43.9537663Z").unwrap();
    assert_eq!(ts.day(), 11);
    assert_eq!(ts.second(), 43);
    assert!(ts.nanosecond() >= 953_766_000);
  }

  #[test]
  fn timestamp_truncated_variant_without_zone() {
    let ts = parse_timestamp("2023-04-11T16:13:43.95376631234").unwrap();
    assert_eq!(ts.nanosecond(), 953_766_000);
  }

  #[test]
  fn timestamp_garbage_is_malformed() {
    let err = parse_timestamp("yesterday").unwrap_err();
    assert!(matches!(err, Error::MalformedTimestamp(s) if s == "yesterday"));
  }

  // ── Altitude ────────────────────────────────────────────────────────────

  #[test]
  fn altitude_in_feet() {
    assert_eq!(normalize_altitude("34100"), Lenient::Parsed(34100));
  }

  #[test]
  fn altitude_as_flight_level() {
    assert_eq!(normalize_altitude("FL350"), Lenient::Parsed(35000));
  }

  #[test]
  fn altitude_garbage_kept_verbatim() {
    assert_eq!(normalize_altitude("garbage"), Lenient::Raw("garbage".into()));
    assert_eq!(normalize_altitude("FL"), Lenient::Raw("FL".into()));
    assert_eq!(normalize_altitude(""), Lenient::Raw(String::new()));
  }

  #[test]
  fn integer_fallback_keeps_text() {
    assert_eq!(normalize_integer::<u32>("509"), Lenient::Parsed(509));
    assert_eq!(normalize_integer::<u32>("M082"), Lenient::Raw("M082".into()));
  }

  // ── HHMM ────────────────────────────────────────────────────────────────

  #[test]
  fn duration_hhmm() {
    assert_eq!(
      normalize_duration("0311").unwrap(),
      TimeDelta::hours(3) + TimeDelta::minutes(11)
    );
    assert_eq!(normalize_duration("1415").unwrap().num_minutes(), 14 * 60 + 15);
  }

  #[test]
  fn duration_malformed_is_an_error() {
    assert!(matches!(
      normalize_duration("3"),
      Err(Error::MalformedDuration(_))
    ));
    assert!(normalize_duration("ab12").is_err());
  }

  #[test]
  fn deptime_anchors_to_given_date() {
    let date = NaiveDate::from_ymd_opt(2023, 4, 11).unwrap();
    let Lenient::Parsed(dt) = normalize_deptime_on("1214", date) else {
      panic!("expected parsed deptime")
    };
    assert_eq!(dt.date_naive(), date);
    assert_eq!((dt.hour(), dt.minute()), (12, 14));
  }

  #[test]
  fn deptime_never_rolls_over() {
    let date = NaiveDate::from_ymd_opt(2023, 4, 11).unwrap();
    let Lenient::Parsed(dt) = normalize_deptime_on("0001", date) else {
      panic!("expected parsed deptime")
    };
    assert_eq!(dt.date_naive(), date);
  }

  #[test]
  fn deptime_malformed_kept_verbatim() {
    let date = NaiveDate::from_ymd_opt(2023, 4, 11).unwrap();
    assert_eq!(normalize_deptime_on("2599", date), Lenient::Raw("2599".into()));
    assert_eq!(normalize_deptime_on("0", date), Lenient::Raw("0".into()));
  }
}
