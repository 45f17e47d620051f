//! The client handle and its per-data-class state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use vatlive_cache::{ConnectionCache, WeatherCache};
use vatlive_core::{UpdatePolicy, transport::Transport};

use crate::{
  config::ClientConfig,
  endpoints::Endpoints,
  error::{Error, Result},
  http::ReqwestTransport,
};

/// Connection-data cache plus the server timestamp of the generation it
/// holds. Guarded by one lock so a refresh is never observed half-stored.
#[derive(Debug)]
pub(crate) struct ConnectionState {
  pub(crate) cache:          ConnectionCache,
  pub(crate) server_updated: Option<DateTime<Utc>>,
}

/// A caching client for the live network-state feed.
///
/// Connection data and weather are refreshed independently, each on its own
/// time-to-live. Every accessor takes an [`UpdatePolicy`] deciding whether
/// it may fetch before answering. Refreshes of one data class are
/// serialised, so concurrent callers that all find the cache stale trigger
/// a single fetch.
#[derive(Debug)]
pub struct LiveClient<T: Transport> {
  pub(crate) transport:  T,
  pub(crate) endpoints:  Endpoints,
  pub(crate) connection: Mutex<ConnectionState>,
  pub(crate) weather:    Mutex<WeatherCache>,
}

impl<T: Transport> LiveClient<T> {
  pub fn new(transport: T, endpoints: Endpoints, config: &ClientConfig) -> Self {
    Self {
      transport,
      endpoints,
      connection: Mutex::new(ConnectionState {
        cache:          ConnectionCache::new(config.connection_ttl()),
        server_updated: None,
      }),
      weather: Mutex::new(WeatherCache::new(config.weather_ttl())),
    }
  }

  pub fn endpoints(&self) -> &Endpoints { &self.endpoints }

  /// The raw snapshot of the current generation.
  pub async fn snapshot(&self, policy: UpdatePolicy) -> Result<Option<Arc<Value>>> {
    Ok(self.connection(policy).await?.cache.snapshot())
  }

  /// Server-side timestamp of the last generation ingested, if any.
  pub async fn server_updated(&self) -> Option<DateTime<Utc>> {
    self.connection.lock().await.server_updated
  }
}

impl LiveClient<ReqwestTransport> {
  /// Build an HTTP client and discover endpoints from `config.status_url`.
  pub async fn connect(config: &ClientConfig) -> Result<Self> {
    let transport = ReqwestTransport::new(config).map_err(Error::transport)?;
    let endpoints = Endpoints::discover(&transport, &config.status_url).await?;
    Ok(Self::new(transport, endpoints, config))
  }
}
