//! The simulation driver: build an overlay, replay random lookups.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use chordal_ring::{OverlayBuilder, Ring};
use chordal_types::{hash_key, KeyId, RouteTrace, SimConfig};

use crate::error::SimError;
use crate::router::lookup;
use crate::stats::AggregateStats;

/// One simulation run over a freshly built overlay.
///
/// Owns the statistics accumulator and threads it explicitly through
/// every ingestion step; nothing in the run mutates shared state
/// behind the driver's back.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    ring: Ring,
    stats: AggregateStats,
    /// Originating nodes for upcoming queries, drawn without
    /// replacement and reshuffled when exhausted.
    origins: Vec<KeyId>,
}

impl Simulation {
    /// Validate the configuration, build the overlay, and record every
    /// node-to-predecessor spacing.
    pub fn build<R: Rng>(config: SimConfig, rng: &mut R) -> Result<Self, SimError> {
        config.validate()?;
        let ring = OverlayBuilder::new(config).build(rng)?;

        let mut stats = AggregateStats::new();
        for spacing in ring.spacings() {
            stats.add_distance(spacing);
        }

        Ok(Self {
            config,
            ring,
            stats,
            origins: Vec::new(),
        })
    }

    /// Replay `queries` random lookups, folding each completed trace
    /// into the statistics. Returns the traces for external export.
    ///
    /// Each query hashes `id_bits` fresh random bytes into a target
    /// key and originates at the next node of a shuffled node list, so
    /// every node initiates roughly the same number of queries.
    pub fn run<R: Rng>(&mut self, queries: usize, rng: &mut R) -> Vec<RouteTrace> {
        let mut traces = Vec::with_capacity(queries);

        for _ in 0..queries {
            if self.origins.is_empty() {
                self.origins = self.ring.ids().copied().collect();
                self.origins.shuffle(rng);
            }
            let start = self
                .origins
                .pop()
                .expect("origin list refilled from a non-empty ring");

            let mut raw = vec![0u8; self.config.id_bits as usize];
            rng.fill_bytes(&mut raw);
            let target = hash_key(&raw, self.config.id_bits);

            debug!(%target, %start, "starting lookup");
            let trace = lookup(&self.ring, target, start);
            debug!(%target, hops = trace.hop_count(), "lookup resolved");

            self.stats.record_route(&trace);
            traces.push(trace);
        }

        info!(
            queries,
            avg_hops = self.stats.avg_hops(),
            end_nodes = self.stats.distinct_end_nodes(),
            "simulation batch complete"
        );
        traces
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }
}
