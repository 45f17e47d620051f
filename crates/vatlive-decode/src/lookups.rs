//! Lookup tables staged during one ingestion cycle.

use std::sync::Arc;

use vatlive_core::{
  lookup::LookupContext,
  record::{ControllerRating, Facility, MilitaryRating, PilotRating, Server},
  table::{ConnTable, Table},
};

/// Lookup tables staged while a generation is being decoded.
///
/// Dependent constructors resolve their foreign keys here, so they only ever
/// see lookup records from the same generation.
#[derive(Debug, Default, Clone)]
pub struct LookupTables {
  facilities:         Arc<Table<i64, Facility>>,
  controller_ratings: Arc<Table<i64, ControllerRating>>,
  pilot_ratings:      Arc<Table<i64, PilotRating>>,
  military_ratings:   Arc<Table<i64, MilitaryRating>>,
  servers:            Arc<Table<String, Server>>,
}

impl LookupTables {
  /// Stage `table` if it is a lookup table. Dependent tables are ignored.
  pub fn absorb(&mut self, table: &ConnTable) {
    match table {
      ConnTable::Facilities(t) => self.facilities = t.clone(),
      ConnTable::ControllerRatings(t) => self.controller_ratings = t.clone(),
      ConnTable::PilotRatings(t) => self.pilot_ratings = t.clone(),
      ConnTable::MilitaryRatings(t) => self.military_ratings = t.clone(),
      ConnTable::Servers(t) => self.servers = t.clone(),
      ConnTable::Pilots(_)
      | ConnTable::Prefiles(_)
      | ConnTable::Controllers(_)
      | ConnTable::Atis(_) => {}
    }
  }
}

impl LookupContext for LookupTables {
  fn facility(&self, id: i64) -> Option<Arc<Facility>> {
    self.facilities.get(&id).cloned()
  }

  fn controller_rating(&self, id: i64) -> Option<Arc<ControllerRating>> {
    self.controller_ratings.get(&id).cloned()
  }

  fn pilot_rating(&self, id: i64) -> Option<Arc<PilotRating>> {
    self.pilot_ratings.get(&id).cloned()
  }

  fn military_rating(&self, id: i64) -> Option<Arc<MilitaryRating>> {
    self.military_ratings.get(&id).cloned()
  }

  fn server(&self, ident: &str) -> Option<Arc<Server>> {
    self.servers.get(ident).cloned()
  }
}
