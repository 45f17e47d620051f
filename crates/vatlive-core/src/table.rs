//! Keyed tables and the traits that tie record types to them.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
  kind::EntityKind,
  record::{
    ActivePilot, Atis, Controller, ControllerRating, Facility, MilitaryRating,
    PilotRating, PrefiledPilot, Server,
  },
};

/// One entity kind's records, keyed by that kind's key field.
pub type Table<K, V> = BTreeMap<K, Arc<V>>;

// ─── Tagged table ────────────────────────────────────────────────────────────

/// A fully built table of one [`EntityKind`].
#[derive(Debug, Clone)]
pub enum ConnTable {
  Facilities(Arc<Table<i64, Facility>>),
  ControllerRatings(Arc<Table<i64, ControllerRating>>),
  PilotRatings(Arc<Table<i64, PilotRating>>),
  MilitaryRatings(Arc<Table<i64, MilitaryRating>>),
  Servers(Arc<Table<String, Server>>),
  Pilots(Arc<Table<u64, ActivePilot>>),
  Prefiles(Arc<Table<u64, PrefiledPilot>>),
  Controllers(Arc<Table<u64, Controller>>),
  Atis(Arc<Table<String, Atis>>),
}

impl ConnTable {
  pub fn kind(&self) -> EntityKind {
    match self {
      ConnTable::Facilities(_) => EntityKind::Facilities,
      ConnTable::ControllerRatings(_) => EntityKind::ControllerRatings,
      ConnTable::PilotRatings(_) => EntityKind::PilotRatings,
      ConnTable::MilitaryRatings(_) => EntityKind::MilitaryRatings,
      ConnTable::Servers(_) => EntityKind::Servers,
      ConnTable::Pilots(_) => EntityKind::Pilots,
      ConnTable::Prefiles(_) => EntityKind::Prefiles,
      ConnTable::Controllers(_) => EntityKind::Controllers,
      ConnTable::Atis(_) => EntityKind::Atis,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      ConnTable::Facilities(t) => t.len(),
      ConnTable::ControllerRatings(t) => t.len(),
      ConnTable::PilotRatings(t) => t.len(),
      ConnTable::MilitaryRatings(t) => t.len(),
      ConnTable::Servers(t) => t.len(),
      ConnTable::Pilots(t) => t.len(),
      ConnTable::Prefiles(t) => t.len(),
      ConnTable::Controllers(t) => t.len(),
      ConnTable::Atis(t) => t.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A record type stored in its own table.
pub trait Entity: Sized + Send + Sync + 'static {
  const KIND: EntityKind;
  type Key: Ord + Clone + fmt::Debug + Send + Sync + 'static;

  fn key(&self) -> Self::Key;

  fn wrap(table: Arc<Table<Self::Key, Self>>) -> ConnTable;

  /// Borrow the typed table if `table` holds this kind.
  fn view(table: &ConnTable) -> Option<&Arc<Table<Self::Key, Self>>>;
}

/// Records that carry a member id and a callsign.
pub trait Identified {
  fn cid(&self) -> u64;
  fn callsign(&self) -> &str;
}

macro_rules! entity {
  ($ty:ty, $variant:ident, $key:ty, |$r:ident| $key_expr:expr) => {
    impl Entity for $ty {
      const KIND: EntityKind = EntityKind::$variant;
      type Key = $key;

      fn key(&self) -> $key {
        let $r = self;
        $key_expr
      }

      fn wrap(table: Arc<Table<$key, Self>>) -> ConnTable {
        ConnTable::$variant(table)
      }

      fn view(table: &ConnTable) -> Option<&Arc<Table<$key, Self>>> {
        match table {
          ConnTable::$variant(t) => Some(t),
          _ => None,
        }
      }
    }
  };
}

entity!(Facility, Facilities, i64, |r| r.id);
entity!(ControllerRating, ControllerRatings, i64, |r| r.id);
entity!(PilotRating, PilotRatings, i64, |r| r.id);
entity!(MilitaryRating, MilitaryRatings, i64, |r| r.id);
entity!(Server, Servers, String, |r| r.ident.clone());
entity!(ActivePilot, Pilots, u64, |r| r.cid);
entity!(PrefiledPilot, Prefiles, u64, |r| r.cid);
entity!(Controller, Controllers, u64, |r| r.station.cid);
entity!(Atis, Atis, String, |r| r.station.callsign.clone());

impl Identified for ActivePilot {
  fn cid(&self) -> u64 { self.cid }

  fn callsign(&self) -> &str { &self.callsign }
}

impl Identified for PrefiledPilot {
  fn cid(&self) -> u64 { self.cid }

  fn callsign(&self) -> &str { &self.callsign }
}

impl Identified for Controller {
  fn cid(&self) -> u64 { self.station.cid }

  fn callsign(&self) -> &str { &self.station.callsign }
}

impl Identified for Atis {
  fn cid(&self) -> u64 { self.station.cid }

  fn callsign(&self) -> &str { &self.station.callsign }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wrap_and_view_round_trip_by_kind() {
    let mut facilities = Table::new();
    facilities.insert(
      4,
      Arc::new(Facility { id: 4, short: "TWR".into(), long: "Tower".into() }),
    );
    let table = Facility::wrap(Arc::new(facilities));

    assert_eq!(table.kind(), EntityKind::Facilities);
    assert_eq!(table.len(), 1);
    assert!(Facility::view(&table).is_some());
    assert!(ControllerRating::view(&table).is_none());
  }
}
