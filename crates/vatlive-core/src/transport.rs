//! The HTTP transport seam.
//!
//! The client never talks to the network directly; it asks a [`Transport`]
//! to fetch a URL and hand back JSON or text. The production implementation
//! lives in `vatlive-client`; tests substitute an in-memory one.

use std::future::Future;

/// "Fetch URL, get JSON or text, or fail."
pub trait Transport: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// `GET url` and decode the body as JSON.
  fn get_json(
    &self,
    url: &str,
  ) -> impl Future<Output = Result<serde_json::Value, Self::Error>> + Send;

  /// `GET url?query` and return the body as text.
  fn get_text(
    &self,
    url: &str,
    query: &[(&str, &str)],
  ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
