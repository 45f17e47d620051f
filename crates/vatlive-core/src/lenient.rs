//! Best-effort parsed values.

use serde::Serialize;

/// A field that is normalised when possible and otherwise keeps the string
/// the upstream feed sent.
///
/// Serialises untagged: either the parsed value or the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Lenient<T> {
  Parsed(T),
  Raw(String),
}

impl<T> Lenient<T> {
  pub fn parsed(&self) -> Option<&T> {
    match self {
      Lenient::Parsed(v) => Some(v),
      Lenient::Raw(_) => None,
    }
  }

  pub fn raw(&self) -> Option<&str> {
    match self {
      Lenient::Parsed(_) => None,
      Lenient::Raw(s) => Some(s),
    }
  }

  pub fn is_parsed(&self) -> bool { matches!(self, Lenient::Parsed(_)) }
}
