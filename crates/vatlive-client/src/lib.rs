//! Caching client for the VATSIM live network-state feed.
//!
//! [`LiveClient`] discovers the data endpoints, fetches and decodes the
//! connection-data snapshot and weather reports, and answers lookups from a
//! time-to-live cache.
//!
//! # Quick start
//!
//! ```no_run
//! use vatlive_client::{ClientConfig, LiveClient, Selector, UpdatePolicy};
//!
//! # async fn run() -> vatlive_client::Result<()> {
//! let client = LiveClient::connect(&ClientConfig::default()).await?;
//! if let Some(pilots) = client
//!   .pilots(&Selector::callsign("^BAW"), UpdatePolicy::IfStale)
//!   .await?
//! {
//!   for pilot in pilots.values() {
//!     println!("{} at {} ft", pilot.callsign, pilot.position.altitude);
//!   }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod ingest;
mod query;

pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;

pub use client::LiveClient;
pub use config::ClientConfig;
pub use endpoints::Endpoints;
pub use error::{Error, Result};
pub use http::{HttpError, ReqwestTransport};
pub use query::{Selector, Single};
pub use vatlive_cache::MetarTable;
pub use vatlive_core::{UpdatePolicy, record, table::Table, transport::Transport};
