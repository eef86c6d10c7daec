//! Error types for the simulation driver.

use chordal_ring::RingError;
use chordal_types::ConfigError;

/// Errors surfaced by a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The simulation parameters were rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Overlay construction failed.
    #[error("overlay construction failed: {0}")]
    Ring(#[from] RingError),
}
