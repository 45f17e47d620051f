//! Error types for `vatlive-core`.

use thiserror::Error;

use crate::kind::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  /// A raw object lacks a field its constructor requires.
  #[error("{entity}: missing field `{field}`")]
  MissingField {
    entity: &'static str,
    field:  String,
  },

  #[error("malformed timestamp: {0:?}")]
  MalformedTimestamp(String),

  #[error("malformed HHMM duration: {0:?}")]
  MalformedDuration(String),

  /// A foreign key did not resolve against the lookup tables of the current
  /// ingestion cycle.
  ///
  /// Fails the whole generation. A single dangling reference upstream keeps
  /// every table at its previous generation until the upstream timestamp
  /// changes.
  #[error("{entity}: no {table} entry with key {key:?}")]
  UnresolvedReference {
    entity: &'static str,
    table:  EntityKind,
    key:    String,
  },

  /// A raw object has the wrong JSON shape: a field of the wrong type, or
  /// `null` where a value is required.
  #[error("{entity}: {source}")]
  Json {
    entity: &'static str,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
