//! Error types for ring construction.

use chordal_types::{ConfigError, KeyId};

/// Errors produced while building the overlay.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The simulation parameters were rejected before construction.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The builder could not place a new distinct node within the
    /// retry ceiling. The overlay is unusable; nothing is partially
    /// built.
    #[error("too many collisions while placing nodes ({0} consecutive rejections)")]
    TooManyCollisions(u32),

    /// Two placements carried the same identifier.
    #[error("duplicate identifier {0} in ring assembly")]
    DuplicateId(KeyId),

    /// A ring needs at least one node.
    #[error("cannot assemble an empty ring")]
    Empty,
}
