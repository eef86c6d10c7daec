//! Shared types for the chordal simulator.
//!
//! This crate defines the identifier space every other crate works in:
//! the fixed-width ring key ([`KeyId`]), the cyclic interval predicate
//! ([`in_interval`]), SHA-512 hashing with nibble truncation
//! ([`hash_key`]), simulation configuration ([`SimConfig`]), and the
//! per-query routing record ([`RouteTrace`]).

pub mod config;
pub mod error;
pub mod hash;
pub mod interval;
pub mod key;
pub mod trace;

pub use config::SimConfig;
pub use error::ConfigError;
pub use hash::{hash_key, truncate_digest};
pub use interval::in_interval;
pub use key::{KeyId, ID_BYTES, MAX_ID_BITS};
pub use trace::RouteTrace;
