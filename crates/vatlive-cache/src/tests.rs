//! Cache behaviour under a paused tokio clock.

use std::{sync::Arc, time::Duration};

use serde_json::json;
use tokio::time;
use vatlive_core::{
  EntityKind,
  record::{Facility, Metar, Server},
  table::{ConnTable, Entity, Table},
};

use crate::{CacheKey, ConnectionCache, MetarTable, TtlCache, WeatherCache};

const TTL: Duration = Duration::from_secs(15);

fn facilities() -> ConnTable {
  let mut table = Table::new();
  table.insert(
    4,
    Arc::new(Facility { id: 4, short: "TWR".into(), long: "Tower".into() }),
  );
  Facility::wrap(Arc::new(table))
}

// ─── TtlCache ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn absent_key_is_stale_and_empty() {
  let cache: TtlCache<&str, u32> = TtlCache::new(TTL);
  assert!(cache.is_stale(&"pilots"));
  assert_eq!(cache.get(&"pilots"), None);
  assert_eq!(cache.last_set(&"pilots"), None);
}

#[tokio::test(start_paused = true)]
async fn fresh_after_put_stale_after_ttl() {
  let mut cache = TtlCache::new(TTL);
  cache.put("pilots", 1);
  assert!(!cache.is_stale(&"pilots"));

  time::advance(TTL).await;
  assert!(!cache.is_stale(&"pilots"), "exactly the TTL is still fresh");

  time::advance(Duration::from_millis(1)).await;
  assert!(cache.is_stale(&"pilots"));
  assert_eq!(cache.get(&"pilots"), Some(&1), "stale values are still served");
}

#[tokio::test(start_paused = true)]
async fn put_overwrites_and_restarts_clock() {
  let mut cache = TtlCache::new(TTL);
  cache.put("pilots", 1);
  let first = cache.last_set(&"pilots").unwrap();

  time::advance(TTL * 2).await;
  cache.put("pilots", 2);

  assert_eq!(cache.get(&"pilots"), Some(&2));
  assert!(!cache.is_stale(&"pilots"));
  assert_eq!(cache.last_set(&"pilots").unwrap() - first, TTL * 2);
}

#[tokio::test(start_paused = true)]
async fn keys_age_independently() {
  let mut cache = TtlCache::new(TTL);
  cache.put("servers", 1);
  time::advance(Duration::from_secs(10)).await;
  cache.put("pilots", 2);
  time::advance(Duration::from_secs(10)).await;

  assert!(cache.is_stale(&"servers"));
  assert!(!cache.is_stale(&"pilots"));
}

// ─── ConnectionCache ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn connection_cache_round_trips_typed_tables() {
  let mut cache = ConnectionCache::new(TTL);
  assert!(cache.table::<Facility>().is_none());

  cache.put_tables([facilities()]);

  let table = cache.table::<Facility>().unwrap();
  assert_eq!(table[&4].short, "TWR");
  assert!(cache.table::<Server>().is_none());
  assert!(!cache.is_stale(CacheKey::Table(EntityKind::Facilities)));
  assert!(cache.is_stale(CacheKey::Table(EntityKind::Servers)));
}

#[tokio::test(start_paused = true)]
async fn snapshot_key_is_separate_from_tables() {
  let mut cache = ConnectionCache::new(TTL);
  cache.put_tables([facilities()]);
  assert!(cache.is_stale(CacheKey::Snapshot));
  assert!(cache.snapshot().is_none());

  cache.put_snapshot(Arc::new(json!({ "general": {} })));
  assert!(!cache.is_stale(CacheKey::Snapshot));
  assert!(cache.snapshot().unwrap().get("general").is_some());
}

#[tokio::test(start_paused = true)]
async fn connection_cache_expires_with_its_ttl() {
  let mut cache = ConnectionCache::new(TTL);
  cache.put_snapshot(Arc::new(json!({})));
  time::advance(TTL + Duration::from_secs(1)).await;
  assert!(cache.is_stale(CacheKey::Snapshot));
  assert_eq!(cache.ttl(), TTL);
}

#[test]
fn cache_keys_display_as_section_names() {
  assert_eq!(CacheKey::Snapshot.to_string(), "snapshot");
  assert_eq!(CacheKey::Table(EntityKind::ControllerRatings).to_string(), "ratings");
}

// ─── WeatherCache ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn weather_cache_has_its_own_ttl() {
  let mut weather = WeatherCache::new(Duration::from_secs(60));
  assert!(weather.is_stale());
  assert!(weather.metars().is_none());

  let mut metars = MetarTable::new();
  metars.insert(
    "EDDK".into(),
    Arc::new(Metar {
      field:     "EDDK".into(),
      time:      None,
      condition: None,
      raw_text:  "EDDK NIL".into(),
    }),
  );
  weather.put(metars);

  time::advance(Duration::from_secs(30)).await;
  assert!(!weather.is_stale());
  assert!(weather.metars().unwrap().contains_key("EDDK"));

  time::advance(Duration::from_secs(31)).await;
  assert!(weather.is_stale());
}
