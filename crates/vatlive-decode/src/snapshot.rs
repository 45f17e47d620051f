//! Whole-snapshot decoding.
//!
//! One [`Generation`] is every table of a connection-data snapshot, built in
//! [`EntityKind::INGEST_ORDER`] against lookup tables from the same snapshot.
//! Nothing is returned unless every table decoded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use vatlive_core::{
  EntityKind, Error, Result,
  lookup::LookupContext,
  record::{
    ActivePilot, Atis, Controller, ControllerRating, Facility, MilitaryRating,
    PilotRating, PrefiledPilot, Server,
  },
  table::{ConnTable, Entity, Table},
};

use crate::{
  construct::FromRaw,
  lookups::LookupTables,
  normalize::parse_timestamp,
  raw::{RawSnapshot, decode},
};

const SNAPSHOT: &str = "snapshot";

/// Every table decoded from one snapshot, plus the server timestamp it
/// carried.
#[derive(Debug, Clone)]
pub struct Generation {
  pub update_timestamp: DateTime<Utc>,
  /// One table per [`EntityKind`], in ingestion order.
  pub tables:           Vec<ConnTable>,
}

impl Generation {
  /// The table of kind `T`, if this generation holds one.
  pub fn table<T: Entity>(&self) -> Option<&Arc<Table<T::Key, T>>> {
    self.tables.iter().find_map(T::view)
  }
}

/// Read `general.update_timestamp` from a snapshot.
pub fn update_timestamp(snapshot: &Value) -> Result<DateTime<Utc>> {
  let header: RawSnapshot = decode(SNAPSHOT, snapshot)?;
  parse_timestamp(&header.general.update_timestamp)
}

/// Decode a section's items and key them. A later item with an
/// already-seen key replaces the earlier one.
pub fn build_table<T>(
  items: &Value,
  ctx: &dyn LookupContext,
) -> Result<Arc<Table<T::Key, T>>>
where
  T: FromRaw + Entity,
{
  let raws: Vec<T::Raw> = decode(T::ENTITY, items)?;
  let mut table = Table::new();
  for raw in raws {
    let record = T::from_raw(raw, ctx)?;
    table.insert(record.key(), Arc::new(record));
  }
  Ok(Arc::new(table))
}

fn build<T: FromRaw + Entity>(items: &Value, ctx: &dyn LookupContext) -> Result<ConnTable> {
  build_table::<T>(items, ctx).map(T::wrap)
}

/// Decode one section's items as `kind`.
pub fn decode_kind(
  kind: EntityKind,
  items: &Value,
  ctx: &dyn LookupContext,
) -> Result<ConnTable> {
  match kind {
    EntityKind::Facilities => build::<Facility>(items, ctx),
    EntityKind::ControllerRatings => build::<ControllerRating>(items, ctx),
    EntityKind::PilotRatings => build::<PilotRating>(items, ctx),
    EntityKind::MilitaryRatings => build::<MilitaryRating>(items, ctx),
    EntityKind::Servers => build::<Server>(items, ctx),
    EntityKind::Pilots => build::<ActivePilot>(items, ctx),
    EntityKind::Prefiles => build::<PrefiledPilot>(items, ctx),
    EntityKind::Controllers => build::<Controller>(items, ctx),
    EntityKind::Atis => build::<Atis>(items, ctx),
  }
}

/// Decode a full connection-data snapshot.
///
/// Fails on the first table that does not decode; in that case no table of
/// the snapshot is returned.
pub fn decode_generation(snapshot: &Value) -> Result<Generation> {
  let update_timestamp = update_timestamp(snapshot)?;

  let mut lookups = LookupTables::default();
  let mut tables = Vec::with_capacity(EntityKind::INGEST_ORDER.len());

  for kind in EntityKind::INGEST_ORDER {
    let items = snapshot
      .get(kind.section())
      .ok_or_else(|| Error::MissingField {
        entity: SNAPSHOT,
        field:  kind.section().to_owned(),
      })?;
    let table = decode_kind(kind, items, &lookups)?;
    debug!(kind = %kind, records = table.len(), "decoded table");
    if kind.is_lookup() {
      lookups.absorb(&table);
    }
    tables.push(table);
  }

  Ok(Generation { update_timestamp, tables })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn fixture() -> Value {
    serde_json::from_str(include_str!(concat!(
      env!("CARGO_MANIFEST_DIR"),
      "/../../testdata/vatsim-data.json"
    )))
    .unwrap()
  }

  #[test]
  fn fixture_decodes_every_table() {
    let generation = decode_generation(&fixture()).unwrap();
    let kinds: Vec<_> = generation.tables.iter().map(ConnTable::kind).collect();
    assert_eq!(kinds, EntityKind::INGEST_ORDER);

    let pilots = generation.table::<ActivePilot>().unwrap();
    let baw = pilots.get(&5555555).unwrap();
    assert_eq!(baw.callsign, "BAW32");

    let atis = generation.table::<Atis>().unwrap();
    assert!(atis.contains_key("EDDK_ATIS"));
  }

  #[test]
  fn shared_lookup_records_are_the_same_allocation() {
    let generation = decode_generation(&fixture()).unwrap();
    let servers = generation.table::<Server>().unwrap();
    let pilots = generation.table::<ActivePilot>().unwrap();
    let pilot = pilots.get(&5555555).unwrap();
    let server = servers.get(&pilot.server.ident).unwrap();
    assert!(Arc::ptr_eq(server, &pilot.server));
  }

  #[test]
  fn update_timestamp_is_read_from_general() {
    let ts = update_timestamp(&fixture()).unwrap();
    assert_eq!(ts.to_rfc3339().get(..19), Some("2023-04-11T16:13:43"));
  }

  #[test]
  fn missing_general_block_fails() {
    assert!(matches!(
      update_timestamp(&json!({ "pilots": [] })),
      Err(Error::MissingField { .. })
    ));
  }

  #[test]
  fn duplicate_keys_keep_the_last_record() {
    let items = json!([
      { "id": 4, "short": "TWR", "long": "Tower" },
      { "id": 4, "short": "TWR", "long": "Tower (renamed)" }
    ]);
    let table = build_table::<Facility>(&items, &LookupTables::default()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[&4].long, "Tower (renamed)");
  }

  #[test]
  fn duplicate_cids_keep_the_last_pilot() {
    let mut snapshot = fixture();
    snapshot["pilots"][1]["cid"] = json!(5555555);
    let generation = decode_generation(&snapshot).unwrap();
    let pilots = generation.table::<ActivePilot>().unwrap();
    assert_eq!(pilots.len(), 2);
    assert_eq!(pilots[&5555555].callsign, "KLM64B");
  }

  #[test]
  fn malformed_section_is_a_json_error() {
    let mut snapshot = fixture();
    snapshot["servers"] = json!({ "UK": {} });
    assert!(matches!(
      decode_generation(&snapshot),
      Err(Error::Json { entity: "server", .. })
    ));
  }

  #[test]
  fn one_bad_record_fails_the_whole_generation() {
    let mut snapshot = fixture();
    snapshot["controllers"][0]
      .as_object_mut()
      .unwrap()
      .remove("callsign");
    assert!(matches!(
      decode_generation(&snapshot),
      Err(Error::MissingField { entity: "controller", .. })
    ));
  }

  #[test]
  fn missing_section_fails() {
    let mut snapshot = fixture();
    snapshot.as_object_mut().unwrap().remove("military_ratings");
    assert!(matches!(
      decode_generation(&snapshot),
      Err(Error::MissingField { entity: "snapshot", ref field }) if field == "military_ratings"
    ));
  }
}
