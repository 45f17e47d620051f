//! Record constructors: one wire object in, one immutable record out.
//!
//! A constructor either returns a fully populated record or fails; no
//! partial records are produced. Foreign keys are resolved through the
//! [`LookupContext`] handed in by the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use vatlive_core::{
  EntityKind, Error, Result,
  lookup::LookupContext,
  record::{
    ActivePilot, Atis, Controller, ControllerRating, Facility, FlightPlan,
    MilitaryRating, PilotRating, Position, PrefiledPilot, Qnh, Server,
    StationInfo,
  },
};

use crate::{
  normalize::{
    normalize_altitude, normalize_deptime, normalize_duration, normalize_integer,
    parse_timestamp,
  },
  raw::{
    RawFlightPlan, RawLookup, RawNamedLookup, RawPilot, RawPrefile, RawServer,
    RawStation, decode,
  },
};

/// Construct a record of `Self` from its wire shape.
pub trait FromRaw: Sized {
  /// Entity name used in error messages.
  const ENTITY: &'static str;

  /// The upstream object this record is built from.
  type Raw: DeserializeOwned;

  fn from_raw(raw: Self::Raw, ctx: &dyn LookupContext) -> Result<Self>;

  fn from_value(value: &Value, ctx: &dyn LookupContext) -> Result<Self> {
    Self::from_raw(decode(Self::ENTITY, value)?, ctx)
  }
}

fn resolve<T>(
  found: Option<Arc<T>>,
  entity: &'static str,
  table: EntityKind,
  key: impl ToString,
) -> Result<Arc<T>> {
  found.ok_or_else(|| Error::UnresolvedReference {
    entity,
    table,
    key: key.to_string(),
  })
}

// ─── Lookup tables ───────────────────────────────────────────────────────────

impl FromRaw for Facility {
  const ENTITY: &'static str = "facility";
  type Raw = RawLookup;

  fn from_raw(raw: RawLookup, _ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self { id: raw.id, short: raw.short, long: raw.long })
  }
}

impl FromRaw for ControllerRating {
  const ENTITY: &'static str = "rating";
  type Raw = RawLookup;

  fn from_raw(raw: RawLookup, _ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self { id: raw.id, short: raw.short, long: raw.long })
  }
}

impl FromRaw for PilotRating {
  const ENTITY: &'static str = "pilot_rating";
  type Raw = RawNamedLookup;

  fn from_raw(raw: RawNamedLookup, _ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self {
      id:         raw.id,
      short:      raw.short_name.clone(),
      long:       raw.long_name.clone(),
      short_name: raw.short_name,
      long_name:  raw.long_name,
    })
  }
}

impl FromRaw for MilitaryRating {
  const ENTITY: &'static str = "military_rating";
  type Raw = RawNamedLookup;

  fn from_raw(raw: RawNamedLookup, _ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self {
      id:         raw.id,
      short:      raw.short_name.clone(),
      long:       raw.long_name.clone(),
      short_name: raw.short_name,
      long_name:  raw.long_name,
    })
  }
}

impl FromRaw for Server {
  const ENTITY: &'static str = "server";
  type Raw = RawServer;

  fn from_raw(raw: RawServer, _ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self {
      ident:                      raw.ident,
      hostname_or_ip:             raw.hostname_or_ip,
      location:                   raw.location,
      name:                       raw.name,
      clients_connection_allowed: raw.clients_connection_allowed,
      client_connections_allowed: raw.client_connections_allowed,
      is_sweatbox:                raw.is_sweatbox,
    })
  }
}

// ─── Flight plans & pilots ───────────────────────────────────────────────────

impl FromRaw for FlightPlan {
  const ENTITY: &'static str = "flight_plan";
  type Raw = RawFlightPlan;

  fn from_raw(raw: RawFlightPlan, _ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self {
      cruise_tas:           normalize_integer(&raw.cruise_tas),
      altitude:             normalize_altitude(&raw.altitude),
      deptime:              normalize_deptime(&raw.deptime),
      enroute_time:         normalize_duration(&raw.enroute_time)?,
      fuel_time:            normalize_duration(&raw.fuel_time)?,
      flight_rules:         raw.flight_rules,
      aircraft:             raw.aircraft,
      aircraft_faa:         raw.aircraft_faa,
      aircraft_short:       raw.aircraft_short,
      departure:            raw.departure,
      arrival:              raw.arrival,
      alternate:            raw.alternate,
      remarks:              raw.remarks,
      route:                raw.route,
      revision_id:          raw.revision_id,
      assigned_transponder: raw.assigned_transponder,
    })
  }
}

impl FromRaw for ActivePilot {
  const ENTITY: &'static str = "pilot";
  type Raw = RawPilot;

  fn from_raw(raw: RawPilot, ctx: &dyn LookupContext) -> Result<Self> {
    let server = resolve(
      ctx.server(&raw.server),
      Self::ENTITY,
      EntityKind::Servers,
      &raw.server,
    )?;
    let pilot_rating = resolve(
      ctx.pilot_rating(raw.pilot_rating),
      Self::ENTITY,
      EntityKind::PilotRatings,
      raw.pilot_rating,
    )?;
    let military_rating = raw
      .military_rating
      .map(|id| {
        resolve(
          ctx.military_rating(id),
          Self::ENTITY,
          EntityKind::MilitaryRatings,
          id,
        )
      })
      .transpose()?;
    let flight_plan = raw
      .flight_plan
      .map(|plan| FlightPlan::from_raw(plan, ctx))
      .transpose()?;

    Ok(Self {
      logon_time: parse_timestamp(&raw.logon_time)?,
      last_updated: parse_timestamp(&raw.last_updated)?,
      cid: raw.cid,
      name: raw.name,
      callsign: raw.callsign,
      server,
      pilot_rating,
      military_rating,
      position: Position {
        latitude:    raw.latitude,
        longitude:   raw.longitude,
        altitude:    raw.altitude,
        heading:     raw.heading,
        groundspeed: raw.groundspeed,
      },
      transponder: raw.transponder,
      qnh: Qnh { inhg: raw.qnh_i_hg, mb: raw.qnh_mb },
      flight_plan,
    })
  }
}

impl FromRaw for PrefiledPilot {
  const ENTITY: &'static str = "prefile";
  type Raw = RawPrefile;

  fn from_raw(raw: RawPrefile, ctx: &dyn LookupContext) -> Result<Self> {
    let plan = raw.flight_plan.ok_or_else(|| Error::MissingField {
      entity: Self::ENTITY,
      field:  "flight_plan".to_owned(),
    })?;

    Ok(Self {
      flight_plan: FlightPlan::from_raw(plan, ctx)?,
      last_updated: parse_timestamp(&raw.last_updated)?,
      cid: raw.cid,
      name: raw.name,
      callsign: raw.callsign,
    })
  }
}

// ─── Controllers & ATIS ──────────────────────────────────────────────────────

/// Build the fields shared by controllers and ATIS, joining `text_atis`
/// lines with `separator`.
fn station(
  raw: RawStation,
  ctx: &dyn LookupContext,
  entity: &'static str,
  separator: &str,
) -> Result<StationInfo> {
  let facility = resolve(
    ctx.facility(raw.facility),
    entity,
    EntityKind::Facilities,
    raw.facility,
  )?;
  let rating = resolve(
    ctx.controller_rating(raw.rating),
    entity,
    EntityKind::ControllerRatings,
    raw.rating,
  )?;
  let server = resolve(
    ctx.server(&raw.server),
    entity,
    EntityKind::Servers,
    &raw.server,
  )?;

  Ok(StationInfo {
    logon_time: parse_timestamp(&raw.logon_time)?,
    last_updated: parse_timestamp(&raw.last_updated)?,
    cid: raw.cid,
    name: raw.name,
    callsign: raw.callsign,
    frequency: raw.frequency,
    facility,
    rating,
    server,
    visual_range: raw.visual_range,
    text_atis: raw.text_atis.map(|lines| lines.join(separator)),
  })
}

impl FromRaw for Controller {
  const ENTITY: &'static str = "controller";
  type Raw = RawStation;

  fn from_raw(raw: RawStation, ctx: &dyn LookupContext) -> Result<Self> {
    Ok(Self { station: station(raw, ctx, Self::ENTITY, "\n")? })
  }
}

impl FromRaw for Atis {
  const ENTITY: &'static str = "atis";
  type Raw = RawStation;

  fn from_raw(mut raw: RawStation, ctx: &dyn LookupContext) -> Result<Self> {
    let atis_code = raw.atis_code.take();
    Ok(Self {
      station: station(raw, ctx, Self::ENTITY, " ")?,
      atis_code,
    })
  }
}
