//! Entity kinds and the caller-facing update policy.

use strum::{Display, IntoStaticStr};

/// The closed set of tables carried by a connection-data snapshot.
///
/// The string form of each variant is the snapshot section it is decoded
/// from and the name it is cached under.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  Facilities,
  #[strum(serialize = "ratings")]
  ControllerRatings,
  PilotRatings,
  MilitaryRatings,
  Servers,
  Pilots,
  Prefiles,
  Controllers,
  Atis,
}

impl EntityKind {
  /// Decode order within one ingestion cycle. Lookup tables come first
  /// because the remaining constructors join against them.
  pub const INGEST_ORDER: [EntityKind; 9] = [
    EntityKind::Facilities,
    EntityKind::ControllerRatings,
    EntityKind::PilotRatings,
    EntityKind::MilitaryRatings,
    EntityKind::Servers,
    EntityKind::Pilots,
    EntityKind::Prefiles,
    EntityKind::Controllers,
    EntityKind::Atis,
  ];

  /// `true` for the tables other tables reference.
  pub fn is_lookup(self) -> bool {
    matches!(
      self,
      EntityKind::Facilities
        | EntityKind::ControllerRatings
        | EntityKind::PilotRatings
        | EntityKind::MilitaryRatings
        | EntityKind::Servers
    )
  }

  /// Top-level key of this table in the connection-data snapshot.
  pub fn section(self) -> &'static str { self.into() }
}

/// Whether an accessor may touch the network before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
  /// Serve whatever is cached, even if stale or absent.
  Skip,
  /// Refresh only when the cache's time-to-live has elapsed.
  #[default]
  IfStale,
  /// Refresh unconditionally.
  Force,
}
