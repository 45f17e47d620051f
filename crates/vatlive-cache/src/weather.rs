//! Weather-report cache.

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use vatlive_core::{record::Metar, table::Table};

use crate::ttl::TtlCache;

/// Weather reports keyed by station.
pub type MetarTable = Table<String, Metar>;

const METARS: &str = "metars";

/// The weather cache. It always holds the full report set under one key.
#[derive(Debug, Clone)]
pub struct WeatherCache {
  inner: TtlCache<&'static str, Arc<MetarTable>>,
}

impl WeatherCache {
  pub fn new(ttl: Duration) -> Self { Self { inner: TtlCache::new(ttl) } }

  pub fn ttl(&self) -> Duration { self.inner.ttl() }

  pub fn is_stale(&self) -> bool { self.inner.is_stale(&METARS) }

  pub fn last_set(&self) -> Option<Instant> { self.inner.last_set(&METARS) }

  pub fn put(&mut self, metars: MetarTable) {
    self.inner.put(METARS, Arc::new(metars));
  }

  pub fn metars(&self) -> Option<Arc<MetarTable>> {
    self.inner.get(&METARS).cloned()
  }
}
