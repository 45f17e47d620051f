//! Wire shapes of the upstream JSON documents.
//!
//! Each type mirrors one feed object field for field. Record constructors
//! turn them into the normalised [`vatlive_core::record`] types; nothing
//! here resolves references or parses timestamps.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Number, Value};
use vatlive_core::{Error, Result};

// ─── Decoding ────────────────────────────────────────────────────────────────

fn missing_field_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^missing field `([^`]+)`").expect("valid regex"))
}

/// Deserialise `value` as `T`, reporting failures against `entity`.
///
/// An absent required field is [`Error::MissingField`]; any other shape
/// mismatch (wrong type, `null` where a value is required) is
/// [`Error::Json`].
pub fn decode<T: DeserializeOwned>(entity: &'static str, value: &Value) -> Result<T> {
  T::deserialize(value).map_err(|source| {
    let message = source.to_string();
    match missing_field_pattern().captures(&message) {
      Some(caps) => Error::MissingField { entity, field: caps[1].to_owned() },
      None => Error::Json { entity, source },
    }
  })
}

/// A scalar the feed sends either as a string or as a bare number
/// (`"cruise_tas": "509"` vs `509`), kept as text.
fn text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum StrOrNum {
    Str(String),
    Num(Number),
  }

  Ok(match StrOrNum::deserialize(de)? {
    StrOrNum::Str(s) => s,
    StrOrNum::Num(n) => n.to_string(),
  })
}

/// A boolean the feed sends either as `true`/`false` or as `1`/`0`.
fn flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum BoolOrInt {
    Bool(bool),
    Int(i64),
  }

  Ok(match BoolOrInt::deserialize(de)? {
    BoolOrInt::Bool(b) => b,
    BoolOrInt::Int(i) => i != 0,
  })
}

// ─── Status document ─────────────────────────────────────────────────────────

/// The status discovery document. Every entry is a list of mirror URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatus {
  pub data:  RawStatusData,
  pub user:  Vec<String>,
  pub metar: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStatusData {
  pub v3:               Vec<String>,
  pub transceivers:     Vec<String>,
  pub servers:          Vec<String>,
  pub servers_sweatbox: Vec<String>,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The part of a connection-data snapshot read before any table is built.
/// Table sections are decoded one kind at a time.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
  pub general: RawGeneral,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGeneral {
  pub update_timestamp: String,
}

/// `{id, short, long}`: facilities and controller ratings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLookup {
  pub id:    i64,
  pub short: String,
  pub long:  String,
}

/// `{id, short_name, long_name}`: pilot and military ratings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamedLookup {
  pub id:         i64,
  pub short_name: String,
  pub long_name:  String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawServer {
  pub ident:                      String,
  pub hostname_or_ip:             String,
  pub location:                   String,
  pub name:                       String,
  #[serde(deserialize_with = "flag")]
  pub clients_connection_allowed: bool,
  #[serde(deserialize_with = "flag")]
  pub client_connections_allowed: bool,
  #[serde(deserialize_with = "flag")]
  pub is_sweatbox:                bool,
}

/// A filed flight plan. The packed and free-text fields stay as text until
/// a constructor normalises them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFlightPlan {
  pub flight_rules:         String,
  pub aircraft:             String,
  pub aircraft_faa:         String,
  pub aircraft_short:       String,
  pub departure:            String,
  pub arrival:              String,
  pub alternate:            String,
  #[serde(deserialize_with = "text")]
  pub cruise_tas:           String,
  #[serde(deserialize_with = "text")]
  pub altitude:             String,
  #[serde(deserialize_with = "text")]
  pub deptime:              String,
  #[serde(deserialize_with = "text")]
  pub enroute_time:         String,
  #[serde(deserialize_with = "text")]
  pub fuel_time:            String,
  pub remarks:              String,
  pub route:                String,
  pub revision_id:          i64,
  pub assigned_transponder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPilot {
  pub cid:             u64,
  pub name:            String,
  pub callsign:        String,
  pub server:          String,
  pub pilot_rating:    i64,
  pub military_rating: Option<i64>,
  pub latitude:        f64,
  pub longitude:       f64,
  pub altitude:        i64,
  pub groundspeed:     i64,
  pub heading:         i64,
  pub transponder:     String,
  pub qnh_i_hg:        f64,
  pub qnh_mb:          i64,
  pub flight_plan:     Option<RawFlightPlan>,
  pub logon_time:      String,
  pub last_updated:    String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrefile {
  pub cid:          u64,
  pub name:         String,
  pub callsign:     String,
  pub flight_plan:  Option<RawFlightPlan>,
  pub last_updated: String,
}

/// A controller or ATIS connection. Controllers carry no `atis_code`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStation {
  pub cid:          u64,
  pub name:         String,
  pub callsign:     String,
  pub frequency:    String,
  pub facility:     i64,
  pub rating:       i64,
  pub server:       String,
  pub visual_range: i64,
  pub atis_code:    Option<String>,
  pub text_atis:    Option<Vec<String>>,
  pub logon_time:   String,
  pub last_updated: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn absent_field_is_missing() {
    let value = json!({ "short": "OBS", "long": "Observer" });
    let err = decode::<RawLookup>("facility", &value).unwrap_err();
    assert!(matches!(
      err,
      Error::MissingField { entity: "facility", ref field } if field == "id"
    ));
  }

  #[test]
  fn wrong_shape_is_a_json_error() {
    let value = json!({ "id": "four", "short": "TWR", "long": "Tower" });
    assert!(matches!(
      decode::<RawLookup>("facility", &value),
      Err(Error::Json { entity: "facility", .. })
    ));

    let value = json!({ "id": null, "short": "TWR", "long": "Tower" });
    assert!(matches!(
      decode::<RawLookup>("facility", &value),
      Err(Error::Json { .. })
    ));
  }

  #[test]
  fn flags_accept_integers_and_booleans() {
    let value = json!({
      "ident": "UK",
      "hostname_or_ip": "178.62.11.117",
      "location": "London, UK",
      "name": "UK",
      "clients_connection_allowed": 1,
      "client_connections_allowed": true,
      "is_sweatbox": 0
    });
    let server = decode::<RawServer>("server", &value).unwrap();
    assert!(server.clients_connection_allowed);
    assert!(server.client_connections_allowed);
    assert!(!server.is_sweatbox);

    let mut bad = value;
    bad["is_sweatbox"] = json!("yes");
    assert!(matches!(
      decode::<RawServer>("server", &bad),
      Err(Error::Json { .. })
    ));
  }

  #[test]
  fn status_lists_decode() {
    let value = json!({
      "data": {
        "v3": ["https://data.vatsim.net/v3/vatsim-data.json"],
        "transceivers": [],
        "servers": [],
        "servers_sweatbox": []
      },
      "user": [],
      "metar": ["https://metar.vatsim.net/metar.php"]
    });
    let status = decode::<RawStatus>("status", &value).unwrap();
    assert_eq!(status.data.v3.len(), 1);
    assert!(status.user.is_empty());
  }

  #[test]
  fn station_nullable_fields_default_to_none() {
    let value = json!({
      "cid": 8899001,
      "name": "Kim Doe",
      "callsign": "LON_S_CTR",
      "frequency": "129.425",
      "facility": 6,
      "rating": 5,
      "server": "UK",
      "visual_range": 300,
      "text_atis": null,
      "logon_time": "2023-04-11T14:02:11Z",
      "last_updated": "2023-04-11T16:13:30Z"
    });
    let station = decode::<RawStation>("controller", &value).unwrap();
    assert_eq!(station.atis_code, None);
    assert_eq!(station.text_atis, None);
  }
}
