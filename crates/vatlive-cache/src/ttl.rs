//! Generic time-to-live store.

use std::{collections::HashMap, hash::Hash, time::Duration};

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Slot<V> {
  value:  V,
  set_at: Instant,
}

/// One value per key, each with the instant it was last stored.
///
/// Values never expire on their own: a stale key still answers [`get`].
/// Staleness only tells the caller it is time to refresh.
///
/// [`get`]: TtlCache::get
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
  ttl:   Duration,
  slots: HashMap<K, Slot<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, slots: HashMap::new() }
  }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// `true` if nothing was ever stored under `key`, or if strictly more than
  /// the TTL has passed since the last store.
  pub fn is_stale(&self, key: &K) -> bool {
    self
      .slots
      .get(key)
      .is_none_or(|slot| slot.set_at.elapsed() > self.ttl)
  }

  pub fn get(&self, key: &K) -> Option<&V> {
    self.slots.get(key).map(|slot| &slot.value)
  }

  /// Replace the value under `key` and restart its clock.
  pub fn put(&mut self, key: K, value: V) {
    self.slots.insert(key, Slot { value, set_at: Instant::now() });
  }

  /// When `key` was last stored, if ever.
  pub fn last_set(&self, key: &K) -> Option<Instant> {
    self.slots.get(key).map(|slot| slot.set_at)
  }
}
