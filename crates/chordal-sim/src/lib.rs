//! Lookup routing and statistics for the chordal simulator.
//!
//! [`lookup`] runs the greedy Chord routing state machine against a
//! built [`Ring`](chordal_ring::Ring); [`AggregateStats`] folds ring
//! spacings and completed [`RouteTrace`](chordal_types::RouteTrace)s
//! into running statistics; [`Simulation`] drives a whole run.

pub mod error;
pub mod router;
pub mod runner;
pub mod stats;

pub use error::SimError;
pub use router::lookup;
pub use runner::Simulation;
pub use stats::AggregateStats;
