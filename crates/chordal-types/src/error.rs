//! Error types for configuration validation.

use crate::key::MAX_ID_BITS;

/// Rejections raised before any construction work begins.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The identifier width is zero or not nibble-aligned. Truncation
    /// works on whole hex nibbles, so only multiples of 4 are valid.
    #[error("identifier width must be a positive multiple of 4, got {0}")]
    BitsNotNibbleAligned(u16),

    /// The identifier width exceeds the SHA-512 digest width.
    #[error("identifier width {0} exceeds the supported maximum of {MAX_ID_BITS} bits")]
    BitsTooLarge(u16),

    /// More nodes were requested than the identifier space can hold.
    #[error("{nodes} nodes cannot fit in a {id_bits}-bit identifier space")]
    TooManyNodes { nodes: usize, id_bits: u16 },
}
