//! Simulation configuration and its validation.

use crate::error::ConfigError;
use crate::key::MAX_ID_BITS;

/// Parameters of one simulated overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Identifier width in bits. Must be a positive multiple of 4, at
    /// most [`MAX_ID_BITS`].
    pub id_bits: u16,
    /// Number of nodes to place on the ring.
    pub nodes: usize,
}

impl SimConfig {
    pub fn new(id_bits: u16, nodes: usize) -> Self {
        Self { id_bits, nodes }
    }

    /// Reject invalid parameters before any construction work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id_bits == 0 || self.id_bits % 4 != 0 {
            return Err(ConfigError::BitsNotNibbleAligned(self.id_bits));
        }
        if self.id_bits > MAX_ID_BITS {
            return Err(ConfigError::BitsTooLarge(self.id_bits));
        }
        // For widths of 64 bits or more the space exceeds usize::MAX.
        if self.id_bits < 64 && self.nodes as u128 > 1u128 << self.id_bits {
            return Err(ConfigError::TooManyNodes {
                nodes: self.nodes,
                id_bits: self.id_bits,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert_eq!(SimConfig::new(16, 100).validate(), Ok(()));
        assert_eq!(SimConfig::new(512, 1).validate(), Ok(()));
        // Entire identifier space occupied.
        assert_eq!(SimConfig::new(4, 16).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_bits() {
        assert_eq!(
            SimConfig::new(0, 10).validate(),
            Err(ConfigError::BitsNotNibbleAligned(0))
        );
    }

    #[test]
    fn test_rejects_unaligned_bits() {
        assert_eq!(
            SimConfig::new(10, 10).validate(),
            Err(ConfigError::BitsNotNibbleAligned(10))
        );
    }

    #[test]
    fn test_rejects_oversized_bits() {
        assert_eq!(
            SimConfig::new(516, 10).validate(),
            Err(ConfigError::BitsTooLarge(516))
        );
    }

    #[test]
    fn test_rejects_overfull_space() {
        assert_eq!(
            SimConfig::new(4, 17).validate(),
            Err(ConfigError::TooManyNodes {
                nodes: 17,
                id_bits: 4
            })
        );
    }
}
