//! Accessors over the cached tables.
//!
//! Many-accessors return `None` rather than an empty table. Single-accessors
//! return `None` when nothing (or, for callsign lookups, more than one
//! record) matches.

use std::{collections::HashSet, sync::Arc};

use regex::RegexSet;
use vatlive_cache::MetarTable;
use vatlive_core::{
  UpdatePolicy,
  record::{
    ActivePilot, Atis, Controller, ControllerRating, Facility, Metar,
    MilitaryRating, PilotRating, PrefiledPilot, Server,
  },
  table::{Entity, Identified, Table},
  transport::Transport,
};

use crate::{client::LiveClient, error::Result, ingest::ALL_STATIONS};

// ─── Selectors ───────────────────────────────────────────────────────────────

/// Which records a many-accessor returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
  #[default]
  All,
  /// Records whose member id is in the list.
  Cids(Vec<u64>),
  /// Records whose callsign contains a match for any of the patterns.
  /// Patterns are regular expressions matched anywhere in the callsign.
  Callsigns(Vec<String>),
}

impl Selector {
  pub fn cid(cid: u64) -> Self { Selector::Cids(vec![cid]) }

  pub fn cids(cids: impl IntoIterator<Item = u64>) -> Self {
    Selector::Cids(cids.into_iter().collect())
  }

  pub fn callsign(pattern: impl Into<String>) -> Self {
    Selector::Callsigns(vec![pattern.into()])
  }

  pub fn callsigns<S: Into<String>>(patterns: impl IntoIterator<Item = S>) -> Self {
    Selector::Callsigns(patterns.into_iter().map(Into::into).collect())
  }

  fn compile(&self) -> Result<Matcher> {
    Ok(match self {
      Selector::All => Matcher::All,
      Selector::Cids(cids) => Matcher::Cids(cids.iter().copied().collect()),
      Selector::Callsigns(patterns) => Matcher::Callsigns(RegexSet::new(patterns)?),
    })
  }
}

enum Matcher {
  All,
  Cids(HashSet<u64>),
  Callsigns(RegexSet),
}

impl Matcher {
  fn matches<R: Identified>(&self, record: &R) -> bool {
    match self {
      Matcher::All => true,
      Matcher::Cids(cids) => cids.contains(&record.cid()),
      Matcher::Callsigns(patterns) => patterns.is_match(record.callsign()),
    }
  }
}

/// How a single-accessor identifies its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Single {
  /// Exact member id.
  Cid(u64),
  /// Exact callsign. Matches only if exactly one record carries it.
  Callsign(String),
}

fn non_empty<K, V>(table: Table<K, V>) -> Option<Arc<Table<K, V>>> {
  (!table.is_empty()).then(|| Arc::new(table))
}

// ─── Generic primitives ──────────────────────────────────────────────────────

impl<T: Transport> LiveClient<T> {
  async fn whole<E: Entity>(
    &self,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<E::Key, E>>>> {
    let state = self.connection(policy).await?;
    Ok(state.cache.table::<E>().filter(|table| !table.is_empty()))
  }

  async fn exact<E: Entity>(
    &self,
    key: &E::Key,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<E>>> {
    let state = self.connection(policy).await?;
    Ok(state.cache.table::<E>().and_then(|table| table.get(key).cloned()))
  }

  async fn filtered<E: Entity>(
    &self,
    policy: UpdatePolicy,
    keep: impl Fn(&E) -> bool,
  ) -> Result<Option<Arc<Table<E::Key, E>>>> {
    let state = self.connection(policy).await?;
    let Some(table) = state.cache.table::<E>() else {
      return Ok(None);
    };
    Ok(non_empty(
      table
        .iter()
        .filter(|&(_, record)| keep(record))
        .map(|(key, record)| (key.clone(), record.clone()))
        .collect(),
    ))
  }

  async fn select<E: Entity + Identified>(
    &self,
    selector: &Selector,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<E::Key, E>>>> {
    match selector.compile()? {
      Matcher::All => self.whole::<E>(policy).await,
      matcher => self.filtered::<E>(policy, |r| matcher.matches(r)).await,
    }
  }

  async fn single<E: Entity<Key = u64> + Identified>(
    &self,
    which: &Single,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<E>>> {
    match which {
      Single::Cid(cid) => self.exact::<E>(cid, policy).await,
      Single::Callsign(callsign) => {
        let found = self
          .filtered::<E>(policy, |r| r.callsign() == callsign.as_str())
          .await?;
        Ok(found.and_then(|table| {
          let mut records = table.values();
          match (records.next(), records.next()) {
            (Some(only), None) => Some(only.clone()),
            _ => None,
          }
        }))
      }
    }
  }

  // ── Pilots ──────────────────────────────────────────────────────────────

  pub async fn pilot(
    &self,
    which: &Single,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<ActivePilot>>> {
    self.single::<ActivePilot>(which, policy).await
  }

  pub async fn pilots(
    &self,
    selector: &Selector,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<u64, ActivePilot>>>> {
    self.select::<ActivePilot>(selector, policy).await
  }

  pub async fn prefiled_pilot(
    &self,
    which: &Single,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<PrefiledPilot>>> {
    self.single::<PrefiledPilot>(which, policy).await
  }

  pub async fn prefiled_pilots(
    &self,
    selector: &Selector,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<u64, PrefiledPilot>>>> {
    self.select::<PrefiledPilot>(selector, policy).await
  }

  // ── Controllers & ATIS ──────────────────────────────────────────────────

  pub async fn controller(
    &self,
    which: &Single,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Controller>>> {
    self.single::<Controller>(which, policy).await
  }

  pub async fn controllers(
    &self,
    selector: &Selector,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<u64, Controller>>>> {
    self.select::<Controller>(selector, policy).await
  }

  /// The ATIS station with exactly this callsign.
  pub async fn atis(
    &self,
    callsign: &str,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Atis>>> {
    self.exact::<Atis>(&callsign.to_owned(), policy).await
  }

  pub async fn atises(
    &self,
    selector: &Selector,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<String, Atis>>>> {
    self.select::<Atis>(selector, policy).await
  }

  // ── Lookup tables ───────────────────────────────────────────────────────

  pub async fn facility(
    &self,
    id: i64,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Facility>>> {
    self.exact::<Facility>(&id, policy).await
  }

  pub async fn facilities(
    &self,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<i64, Facility>>>> {
    self.whole::<Facility>(policy).await
  }

  pub async fn controller_rating(
    &self,
    id: i64,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<ControllerRating>>> {
    self.exact::<ControllerRating>(&id, policy).await
  }

  pub async fn controller_ratings(
    &self,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<i64, ControllerRating>>>> {
    self.whole::<ControllerRating>(policy).await
  }

  pub async fn pilot_rating(
    &self,
    id: i64,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<PilotRating>>> {
    self.exact::<PilotRating>(&id, policy).await
  }

  pub async fn pilot_ratings(
    &self,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<i64, PilotRating>>>> {
    self.whole::<PilotRating>(policy).await
  }

  pub async fn military_rating(
    &self,
    id: i64,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<MilitaryRating>>> {
    self.exact::<MilitaryRating>(&id, policy).await
  }

  pub async fn military_ratings(
    &self,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<i64, MilitaryRating>>>> {
    self.whole::<MilitaryRating>(policy).await
  }

  pub async fn server(
    &self,
    ident: &str,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Server>>> {
    self.exact::<Server>(&ident.to_owned(), policy).await
  }

  pub async fn servers(
    &self,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Table<String, Server>>>> {
    self.whole::<Server>(policy).await
  }

  // ── Weather ─────────────────────────────────────────────────────────────

  /// The cached report for one station.
  pub async fn metar(
    &self,
    station: &str,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<Metar>>> {
    let weather = self.weather(policy).await?;
    Ok(weather.metars().and_then(|metars| metars.get(station).cloned()))
  }

  /// Cached reports for `stations`, or for every station when `None`.
  pub async fn metars(
    &self,
    stations: Option<&[&str]>,
    policy: UpdatePolicy,
  ) -> Result<Option<Arc<MetarTable>>> {
    let weather = self.weather(policy).await?;
    let Some(metars) = weather.metars() else {
      return Ok(None);
    };
    Ok(match stations {
      None => Some(metars).filter(|metars| !metars.is_empty()),
      Some(stations) => non_empty(
        stations
          .iter()
          .filter_map(|station| {
            metars
              .get(*station)
              .map(|metar| (station.to_string(), metar.clone()))
          })
          .collect(),
      ),
    })
  }

  /// Fetch reports for `stations` directly, bypassing the weather cache.
  /// An empty list asks for every station.
  pub async fn fetch_metars(&self, stations: &[&str]) -> Result<MetarTable> {
    if stations.is_empty() {
      self.fetch_weather(ALL_STATIONS).await
    } else {
      self.fetch_weather(&stations.join(",")).await
    }
  }
}
