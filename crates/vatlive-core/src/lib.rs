//! Core types and trait definitions for the vatlive network-state client.
//!
//! Decoding, caching and the client all depend on this crate. It holds no
//! HTTP or caching code itself.

pub mod error;
pub mod kind;
pub mod lenient;
pub mod lookup;
pub mod record;
pub mod table;
pub mod transport;

pub use error::{Error, Result};
pub use kind::{EntityKind, UpdatePolicy};
pub use lenient::Lenient;
