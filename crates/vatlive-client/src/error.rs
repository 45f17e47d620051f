//! Client error type.

use thiserror::Error;

/// An error returned by a [`LiveClient`](crate::LiveClient) operation.
#[derive(Debug, Error)]
pub enum Error {
  /// A fetch could not complete. Never retried inside the client.
  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("decode error: {0}")]
  Decode(#[from] vatlive_core::Error),

  #[error("invalid callsign pattern: {0}")]
  InvalidPattern(#[from] regex::Error),
}

impl Error {
  pub(crate) fn transport(
    err: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Error::Transport(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
