//! Time-to-live caches for vatlive.
//!
//! [`TtlCache`] is the generic store. [`ConnectionCache`] and
//! [`WeatherCache`] fix its keys and value shapes for the two data classes
//! the client refreshes independently.
//!
//! Elapsed time is measured with [`tokio::time::Instant`], so a paused test
//! runtime drives expiry deterministically.

mod connection;
mod ttl;
mod weather;

pub use connection::{CacheKey, ConnectionCache};
pub use ttl::TtlCache;
pub use weather::{MetarTable, WeatherCache};

#[cfg(test)]
mod tests;
