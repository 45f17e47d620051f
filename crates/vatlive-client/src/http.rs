//! reqwest-backed [`Transport`].

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use vatlive_core::transport::Transport;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum HttpError {
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("GET {url} returned {status}")]
  Status { url: String, status: StatusCode },
}

/// HTTP transport with a pooled client, request timeout and user agent.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  http: Client,
}

impl ReqwestTransport {
  pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
    let http = Client::builder()
      .timeout(config.http_timeout())
      .user_agent(&config.user_agent)
      .build()?;
    Ok(Self { http })
  }

  async fn send(
    &self,
    url: &str,
    query: &[(&str, &str)],
  ) -> Result<reqwest::Response, HttpError> {
    let response = self.http.get(url).query(query).send().await?;
    let status = response.status();
    debug!(url, %status, "fetched");
    if !status.is_success() {
      return Err(HttpError::Status { url: url.to_owned(), status });
    }
    Ok(response)
  }
}

impl Transport for ReqwestTransport {
  type Error = HttpError;

  async fn get_json(&self, url: &str) -> Result<Value, HttpError> {
    Ok(self.send(url, &[]).await?.json().await?)
  }

  async fn get_text(
    &self,
    url: &str,
    query: &[(&str, &str)],
  ) -> Result<String, HttpError> {
    Ok(self.send(url, query).await?.text().await?)
  }
}
