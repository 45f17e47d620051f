//! Snapshot and weather-report decoding for vatlive.
//!
//! Deserialises upstream JSON into the [`raw`] wire shapes, then builds
//! [`vatlive_core::record`] types from them. Weather report lines are parsed
//! separately. Pure synchronous; no HTTP or caching.
//!
//! # Quick start
//!
//! ```no_run
//! use vatlive_decode::{decode_generation, parse_metar};
//!
//! # fn load() -> serde_json::Value { unimplemented!() }
//! let snapshot = load();
//! let generation = decode_generation(&snapshot).unwrap();
//! println!("{} tables as of {}", generation.tables.len(), generation.update_timestamp);
//!
//! let metar = parse_metar("KSFO 211651Z 28012KT 10SM FEW008 14/09 A3002");
//! assert_eq!(metar.field, "KSFO");
//! ```

mod construct;
mod lookups;
mod metar;
pub mod normalize;
pub mod raw;
mod snapshot;

pub use construct::FromRaw;
pub use lookups::LookupTables;
pub use metar::{parse_metar, parse_metar_on, parse_metars};
pub use normalize::{
  normalize_altitude, normalize_deptime, normalize_deptime_on, normalize_duration,
  normalize_integer, parse_timestamp,
};
pub use raw::decode;
pub use snapshot::{Generation, build_table, decode_generation, decode_kind, update_timestamp};
pub use vatlive_core::{Error, Result};
