//! Connection-data cache: the raw snapshot and one table per entity kind.

use std::{fmt, sync::Arc, time::Duration};

use serde_json::Value;
use tokio::time::Instant;
use vatlive_core::{
  EntityKind,
  table::{ConnTable, Entity, Table},
};

use crate::ttl::TtlCache;

/// A slot in the connection-data cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
  /// The raw snapshot payload. Its age drives connection-data refreshes.
  Snapshot,
  Table(EntityKind),
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CacheKey::Snapshot => f.write_str("snapshot"),
      CacheKey::Table(kind) => write!(f, "{kind}"),
    }
  }
}

#[derive(Debug, Clone)]
enum Cached {
  Snapshot(Arc<Value>),
  Table(ConnTable),
}

/// The raw snapshot plus one table per [`EntityKind`], each stamped with
/// when it was stored.
#[derive(Debug, Clone)]
pub struct ConnectionCache {
  inner: TtlCache<CacheKey, Cached>,
}

impl ConnectionCache {
  pub fn new(ttl: Duration) -> Self { Self { inner: TtlCache::new(ttl) } }

  pub fn ttl(&self) -> Duration { self.inner.ttl() }

  pub fn is_stale(&self, key: CacheKey) -> bool { self.inner.is_stale(&key) }

  pub fn last_set(&self, key: CacheKey) -> Option<Instant> {
    self.inner.last_set(&key)
  }

  // ── Writes ──────────────────────────────────────────────────────────────

  pub fn put_snapshot(&mut self, snapshot: Arc<Value>) {
    self.inner.put(CacheKey::Snapshot, Cached::Snapshot(snapshot));
  }

  /// Store every table of one generation, each under its own kind.
  pub fn put_tables(&mut self, tables: impl IntoIterator<Item = ConnTable>) {
    for table in tables {
      self.inner.put(CacheKey::Table(table.kind()), Cached::Table(table));
    }
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub fn snapshot(&self) -> Option<Arc<Value>> {
    match self.inner.get(&CacheKey::Snapshot)? {
      Cached::Snapshot(snapshot) => Some(snapshot.clone()),
      Cached::Table(_) => None,
    }
  }

  /// The cached table of kind `T`, if one has been stored.
  pub fn table<T: Entity>(&self) -> Option<Arc<Table<T::Key, T>>> {
    match self.inner.get(&CacheKey::Table(T::KIND))? {
      Cached::Table(table) => T::view(table).cloned(),
      Cached::Snapshot(_) => None,
    }
  }
}
