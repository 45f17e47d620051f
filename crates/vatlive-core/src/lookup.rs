//! The lookup context record constructors join against.

use std::sync::Arc;

use crate::record::{ControllerRating, Facility, MilitaryRating, PilotRating, Server};

/// Resolves foreign keys to shared lookup records.
///
/// Implemented by whatever holds the lookup tables of the generation being
/// built; dependent constructors only ever see this trait.
pub trait LookupContext {
  fn facility(&self, id: i64) -> Option<Arc<Facility>>;
  fn controller_rating(&self, id: i64) -> Option<Arc<ControllerRating>>;
  fn pilot_rating(&self, id: i64) -> Option<Arc<PilotRating>>;
  fn military_rating(&self, id: i64) -> Option<Arc<MilitaryRating>>;
  fn server(&self, ident: &str) -> Option<Arc<Server>>;
}
