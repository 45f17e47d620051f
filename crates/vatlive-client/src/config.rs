//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_STATUS_URL: &str = "https://status.vatsim.net/status.json";

/// Settings for a [`LiveClient`](crate::LiveClient).
///
/// Every field has a default, so a partial config file deserialises.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Status discovery document listing the data endpoints.
  pub status_url:          String,
  pub connection_ttl_secs: u64,
  pub weather_ttl_secs:    u64,
  pub http_timeout_secs:   u64,
  pub user_agent:          String,
}

impl ClientConfig {
  pub fn connection_ttl(&self) -> Duration {
    Duration::from_secs(self.connection_ttl_secs)
  }

  pub fn weather_ttl(&self) -> Duration {
    Duration::from_secs(self.weather_ttl_secs)
  }

  pub fn http_timeout(&self) -> Duration {
    Duration::from_secs(self.http_timeout_secs)
  }
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      status_url:          DEFAULT_STATUS_URL.to_owned(),
      connection_ttl_secs: 15,
      weather_ttl_secs:    60,
      http_timeout_secs:   30,
      user_agent:          concat!("vatlive/", env!("CARGO_PKG_VERSION")).to_owned(),
    }
  }
}
