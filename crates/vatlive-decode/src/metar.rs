//! Weather report lines.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use tracing::trace;
use vatlive_core::record::Metar;

fn metar_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"^(?P<field>\S+?) (?P<time>[0-9]{6}Z?) (?P<condition>.*)")
      .expect("valid regex")
  })
}

/// Parse one report line, taking the year and month of its `DDHHMM` token
/// from today's UTC date.
pub fn parse_metar(line: &str) -> Metar {
  parse_metar_on(line, Utc::now().date_naive())
}

/// [`parse_metar`] against an explicit date; only its year and month are
/// used.
///
/// Never fails. A line that does not match, or whose time token is not a
/// real instant in that month, keeps its first four characters as the
/// station and leaves time and condition empty.
pub fn parse_metar_on(line: &str, today: NaiveDate) -> Metar {
  let parsed = metar_pattern().captures(line).and_then(|caps| {
    let time = &caps["time"];
    let day = time[0..2].parse().ok()?;
    let hour = time[2..4].parse().ok()?;
    let minute = time[4..6].parse().ok()?;
    let observed = NaiveDate::from_ymd_opt(today.year(), today.month(), day)?
      .and_hms_opt(hour, minute, 0)?
      .and_utc();
    Some((caps["field"].to_owned(), observed, caps["condition"].to_owned()))
  });

  match parsed {
    Some((field, time, condition)) => Metar {
      field,
      time: Some(time),
      condition: Some(condition),
      raw_text: line.to_owned(),
    },
    None => {
      trace!(line, "weather line did not match; keeping raw text");
      Metar {
        field:     line.chars().take(4).collect(),
        time:      None,
        condition: None,
        raw_text:  line.to_owned(),
      }
    }
  }
}

/// Parse a multi-line weather response, one report per non-blank line.
pub fn parse_metars(text: &str) -> Vec<Metar> {
  text
    .lines()
    .filter(|line| !line.trim().is_empty())
    .map(parse_metar)
    .collect()
}
