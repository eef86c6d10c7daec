//! Random overlay construction with bounded collision retries.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use tracing::{info, trace};

use chordal_types::{hash_key, KeyId, SimConfig};

use crate::error::RingError;
use crate::ring::Ring;

/// Consecutive placement rejections tolerated before construction
/// aborts. Bounds worst-case runtime and surfaces configurations the
/// identifier space cannot distinctly hold.
pub const MAX_PLACEMENT_REJECTIONS: u32 = 500_000;

/// Places `N` distinct simulated endpoints on the ring.
#[derive(Debug, Clone)]
pub struct OverlayBuilder {
    config: SimConfig,
}

impl OverlayBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Build the overlay with the standard SHA-512 key derivation.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Ring, RingError> {
        let bits = self.config.id_bits;
        self.build_with_hasher(rng, |endpoint| hash_key(endpoint, bits))
    }

    /// Build the overlay with an injected hash function.
    ///
    /// The seam exists so degenerate hashers (e.g. a constant function
    /// that can never place two nodes) can be exercised without
    /// waiting out the retry ceiling on real digests.
    pub fn build_with_hasher<R, H>(&self, rng: &mut R, hasher: H) -> Result<Ring, RingError>
    where
        R: Rng,
        H: Fn(&[u8]) -> KeyId,
    {
        self.config.validate()?;

        let mut generated: HashSet<String> = HashSet::new();
        let mut placements: BTreeMap<KeyId, String> = BTreeMap::new();
        let mut rejections = 0u32;

        while placements.len() < self.config.nodes {
            let endpoint = random_endpoint(rng);
            if !generated.insert(endpoint.clone()) {
                // The endpoint string itself was already generated.
                rejections += 1;
                if rejections >= MAX_PLACEMENT_REJECTIONS {
                    return Err(RingError::TooManyCollisions(rejections));
                }
                continue;
            }

            let id = hasher(endpoint.as_bytes());
            if placements.contains_key(&id) {
                trace!(%id, endpoint, "identifier collision, retrying");
                rejections += 1;
                if rejections >= MAX_PLACEMENT_REJECTIONS {
                    return Err(RingError::TooManyCollisions(rejections));
                }
                continue;
            }

            rejections = 0;
            trace!(%id, endpoint, placed = placements.len() + 1, "placed node");
            placements.insert(id, endpoint);
        }

        let ring = Ring::assemble(placements.into_iter().collect(), self.config.id_bits)?;
        info!(
            nodes = ring.len(),
            id_bits = self.config.id_bits,
            "overlay built"
        );
        Ok(ring)
    }
}

/// Synthesize a random `"A.B.C.D:port"` endpoint string: four random
/// octets and a port in `0..65536`.
fn random_endpoint<R: Rng>(rng: &mut R) -> String {
    format!(
        "{}.{}.{}.{}:{}",
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random_range(0..65536)
    )
}
