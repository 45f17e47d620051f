//! Record types: the normalised, immutable view of one snapshot.
//!
//! Records are rebuilt wholesale on every ingestion cycle and never mutated.
//! Lookup records (servers, facilities, ratings) are shared by reference
//! between the records that point at them; a flight plan is owned by exactly
//! one pilot.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::lenient::Lenient;

// ─── Lookup entries ──────────────────────────────────────────────────────────

/// The `{id, short, long}` shape shared by every lookup table.
pub trait LookupEntry {
  fn id(&self) -> i64;
  fn short(&self) -> &str;
  fn long(&self) -> &str;
}

/// An ATC position type (`TWR`, `APP`, `CTR`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
  pub id:    i64,
  pub short: String,
  pub long:  String,
}

/// A controller rating (`S1`, `C1`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerRating {
  pub id:    i64,
  pub short: String,
  pub long:  String,
}

/// A pilot rating. Upstream sends `short_name`/`long_name`; `short`/`long`
/// carry the same text so every lookup entry displays uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilotRating {
  pub id:         i64,
  pub short:      String,
  pub long:       String,
  pub short_name: String,
  pub long_name:  String,
}

/// A military pilot rating; same shape as [`PilotRating`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilitaryRating {
  pub id:         i64,
  pub short:      String,
  pub long:       String,
  pub short_name: String,
  pub long_name:  String,
}

impl LookupEntry for Facility {
  fn id(&self) -> i64 { self.id }

  fn short(&self) -> &str { &self.short }

  fn long(&self) -> &str { &self.long }
}

impl LookupEntry for ControllerRating {
  fn id(&self) -> i64 { self.id }

  fn short(&self) -> &str { &self.short }

  fn long(&self) -> &str { &self.long }
}

impl LookupEntry for PilotRating {
  fn id(&self) -> i64 { self.id }

  fn short(&self) -> &str { &self.short }

  fn long(&self) -> &str { &self.long }
}

impl LookupEntry for MilitaryRating {
  fn id(&self) -> i64 { self.id }

  fn short(&self) -> &str { &self.short }

  fn long(&self) -> &str { &self.long }
}

// ─── Servers ─────────────────────────────────────────────────────────────────

/// An FSD server clients connect through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
  pub ident:                      String,
  pub hostname_or_ip:             String,
  pub location:                   String,
  pub name:                       String,
  pub clients_connection_allowed: bool,
  pub client_connections_allowed: bool,
  pub is_sweatbox:                bool,
}

// ─── Flight plans ────────────────────────────────────────────────────────────

/// A filed flight plan.
///
/// `altitude` is always in feet once parsed, whether it was filed as feet or
/// as a flight level. `deptime` is anchored to the UTC date on which it was
/// decoded and never rolls over to the next day, so a prefiled plan whose
/// departure time-of-day has already passed reads as earlier today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
  pub flight_rules:         String,
  pub aircraft:             String,
  pub aircraft_faa:         String,
  pub aircraft_short:       String,
  pub departure:            String,
  pub arrival:              String,
  pub alternate:            String,
  pub cruise_tas:           Lenient<u32>,
  pub altitude:             Lenient<i64>,
  pub deptime:              Lenient<DateTime<Utc>>,
  #[serde(serialize_with = "as_minutes")]
  pub enroute_time:         TimeDelta,
  #[serde(serialize_with = "as_minutes")]
  pub fuel_time:            TimeDelta,
  pub remarks:              String,
  pub route:                String,
  pub revision_id:          i64,
  pub assigned_transponder: String,
}

fn as_minutes<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_i64(d.num_minutes())
}

// ─── Pilots ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
  pub latitude:    f64,
  pub longitude:   f64,
  /// Feet.
  pub altitude:    i64,
  pub heading:     i64,
  /// Knots.
  pub groundspeed: i64,
}

/// Altimeter setting in both units the feed reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qnh {
  pub inhg: f64,
  pub mb:   i64,
}

/// A pilot currently connected to the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePilot {
  pub cid:             u64,
  pub name:            String,
  pub callsign:        String,
  pub server:          Arc<Server>,
  pub pilot_rating:    Arc<PilotRating>,
  pub military_rating: Option<Arc<MilitaryRating>>,
  pub position:        Position,
  pub transponder:     String,
  pub qnh:             Qnh,
  pub flight_plan:     Option<FlightPlan>,
  pub logon_time:      DateTime<Utc>,
  pub last_updated:    DateTime<Utc>,
}

/// A pilot who has filed a flight plan but is not yet connected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefiledPilot {
  pub cid:          u64,
  pub name:         String,
  pub callsign:     String,
  pub flight_plan:  FlightPlan,
  pub last_updated: DateTime<Utc>,
}

// ─── Controllers & ATIS ──────────────────────────────────────────────────────

/// Fields common to controller and ATIS connections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInfo {
  pub cid:          u64,
  pub name:         String,
  pub callsign:     String,
  pub frequency:    String,
  pub facility:     Arc<Facility>,
  pub rating:       Arc<ControllerRating>,
  pub server:       Arc<Server>,
  pub visual_range: i64,
  /// Controller info lines joined into one string, or `None` when the feed
  /// sent null.
  pub text_atis:    Option<String>,
  pub logon_time:   DateTime<Utc>,
  pub last_updated: DateTime<Utc>,
}

/// A connected air traffic controller. `text_atis` lines are joined with
/// newlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controller {
  #[serde(flatten)]
  pub station: StationInfo,
}

/// An ATIS broadcast. `text_atis` lines are joined with spaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atis {
  #[serde(flatten)]
  pub station:   StationInfo,
  pub atis_code: Option<String>,
}

// ─── Weather ─────────────────────────────────────────────────────────────────

/// One raw weather report line.
///
/// When the line does not match `<field> <DDHHMM>[Z] <condition>`, `field`
/// holds the first four characters and `time`/`condition` are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metar {
  pub field:     String,
  pub time:      Option<DateTime<Utc>>,
  pub condition: Option<String>,
  pub raw_text:  String,
}
