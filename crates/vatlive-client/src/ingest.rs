//! Refresh flows.
//!
//! Each flow runs with its data class's lock held from the staleness check
//! through the final store. A generation is fully decoded before anything
//! is stored; a failed cycle leaves the previous generation in place.

use std::sync::Arc;

use tokio::sync::MutexGuard;
use tracing::{debug, info};
use vatlive_cache::{CacheKey, MetarTable, WeatherCache};
use vatlive_core::{UpdatePolicy, transport::Transport};
use vatlive_decode::{decode_generation, parse_metars, update_timestamp};

use crate::{
  client::{ConnectionState, LiveClient},
  error::{Error, Result},
};

/// Query value the weather endpoint takes for "every station".
pub(crate) const ALL_STATIONS: &str = "all";

fn should_refresh(policy: UpdatePolicy, stale: bool) -> bool {
  match policy {
    UpdatePolicy::Skip => false,
    UpdatePolicy::IfStale => stale,
    UpdatePolicy::Force => true,
  }
}

/// Key reports by station; a later line for the same station wins.
pub(crate) fn metar_table(text: &str) -> MetarTable {
  parse_metars(text)
    .into_iter()
    .map(|metar| (metar.field.clone(), Arc::new(metar)))
    .collect()
}

impl<T: Transport> LiveClient<T> {
  // ── Connection data ─────────────────────────────────────────────────────

  /// Lock the connection cache, refreshing it first if `policy` asks.
  pub(crate) async fn connection(
    &self,
    policy: UpdatePolicy,
  ) -> Result<MutexGuard<'_, ConnectionState>> {
    let mut state = self.connection.lock().await;
    if should_refresh(policy, state.cache.is_stale(CacheKey::Snapshot)) {
      self.refresh_connection(&mut state).await?;
    }
    Ok(state)
  }

  async fn refresh_connection(&self, state: &mut ConnectionState) -> Result<()> {
    let url = &self.endpoints.data_v3;
    debug!(%url, "fetching connection data");
    let snapshot = self
      .transport
      .get_json(url)
      .await
      .map_err(Error::transport)?;

    let updated = update_timestamp(&snapshot)?;
    if state.server_updated == Some(updated) {
      debug!(%updated, "server data unchanged, keeping cached generation");
      return Ok(());
    }

    let generation = decode_generation(&snapshot)?;
    let counts: Vec<_> = generation
      .tables
      .iter()
      .map(|table| format!("{}={}", table.kind(), table.len()))
      .collect();

    state.cache.put_snapshot(Arc::new(snapshot));
    state.cache.put_tables(generation.tables);
    state.server_updated = Some(generation.update_timestamp);

    info!(%updated, tables = %counts.join(" "), "ingested connection data");
    Ok(())
  }

  // ── Weather ─────────────────────────────────────────────────────────────

  /// Lock the weather cache, refreshing it first if `policy` asks.
  pub(crate) async fn weather(
    &self,
    policy: UpdatePolicy,
  ) -> Result<MutexGuard<'_, WeatherCache>> {
    let mut weather = self.weather.lock().await;
    if should_refresh(policy, weather.is_stale()) {
      let metars = self.fetch_weather(ALL_STATIONS).await?;
      info!(reports = metars.len(), "ingested weather reports");
      weather.put(metars);
    }
    Ok(weather)
  }

  pub(crate) async fn fetch_weather(&self, stations: &str) -> Result<MetarTable> {
    let url = &self.endpoints.metar;
    debug!(%url, stations, "fetching weather reports");
    let text = self
      .transport
      .get_text(url, &[("id", stations)])
      .await
      .map_err(Error::transport)?;
    Ok(metar_table(&text))
  }
}
