//! Ring construction for the chordal simulator.
//!
//! [`OverlayBuilder`] synthesizes random endpoints, hashes each to an
//! identifier with bounded collision retries, and assembles the sorted
//! [`Ring`]: every [`Node`] linked to its cyclic neighbors and equipped
//! with a successor-compressed finger table.

pub mod builder;
pub mod error;
pub mod node;
pub mod ring;

pub use builder::{OverlayBuilder, MAX_PLACEMENT_REJECTIONS};
pub use error::RingError;
pub use node::{Finger, Node};
pub use ring::Ring;
