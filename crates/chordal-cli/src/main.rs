//! `chordal` — Chord overlay simulator CLI.
//!
//! Builds an in-memory Chord ring, replays a batch of random lookups
//! against it, and writes the topology and routing statistics as CSV
//! for external plotting tools.
//!
//! # Usage
//!
//! ```text
//! chordal simulate --bits 16 --nodes 500            # full run
//! chordal simulate -c chordal.toml --seed 42        # reproducible run
//! chordal simulate --traces                         # also dump JSON traces
//! chordal topology --bits 8 --nodes 16              # print topology CSV
//! ```

mod config;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use chordal_sim::Simulation;
use chordal_types::{RouteTrace, SimConfig};

use config::{CliConfig, OutputSection};

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "chordal", version, about = "Chord overlay simulator")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an overlay, replay lookups, write topology and routing CSVs.
    Simulate {
        /// Identifier width in bits (positive multiple of 4, max 512).
        #[arg(short, long)]
        bits: Option<u16>,

        /// Number of nodes to place on the ring.
        #[arg(short, long)]
        nodes: Option<usize>,

        /// Number of lookups to replay (defaults to the node count).
        #[arg(short, long)]
        queries: Option<usize>,

        /// RNG seed for a reproducible run.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory for result files.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also dump every per-query trace as pretty-printed JSON.
        #[arg(short, long)]
        traces: bool,
    },

    /// Build an overlay and print its topology CSV to stdout.
    Topology {
        /// Identifier width in bits (positive multiple of 4, max 512).
        #[arg(short, long)]
        bits: Option<u16>,

        /// Number of nodes to place on the ring.
        #[arg(short, long)]
        nodes: Option<usize>,

        /// RNG seed for a reproducible overlay.
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::Simulate {
            bits,
            nodes,
            queries,
            seed,
            output_dir,
            traces,
        } => {
            // CLI args override config file values.
            if let Some(b) = bits {
                config.simulation.id_bits = b;
            }
            if let Some(n) = nodes {
                config.simulation.nodes = n;
            }
            if queries.is_some() {
                config.simulation.queries = queries;
            }
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if traces {
                config.output.traces = true;
            }
            cmd_simulate(&config)
        }
        Commands::Topology { bits, nodes, seed } => {
            if let Some(b) = bits {
                config.simulation.id_bits = b;
            }
            if let Some(n) = nodes {
                config.simulation.nodes = n;
            }
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            cmd_topology(&config)
        }
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

// -----------------------------------------------------------------------
// chordal simulate
// -----------------------------------------------------------------------

fn cmd_simulate(config: &CliConfig) -> Result<()> {
    let sim_config = SimConfig::new(config.simulation.id_bits, config.simulation.nodes);
    let queries = config.queries();
    info!(
        id_bits = sim_config.id_bits,
        nodes = sim_config.nodes,
        queries,
        seed = ?config.simulation.seed,
        "starting simulation"
    );

    let mut rng = make_rng(config.simulation.seed);
    let mut sim =
        Simulation::build(sim_config, &mut rng).context("overlay construction failed")?;
    let traces = sim.run(queries, &mut rng);

    let written = write_outputs(&config.output, &sim, &traces)?;
    println!("topology: {}", written.topology.display());
    println!("routing:  {}", written.routing.display());
    if let Some(path) = &written.traces {
        println!("traces:   {}", path.display());
    }

    Ok(())
}

/// Result files produced by one `simulate` invocation.
struct WrittenFiles {
    topology: PathBuf,
    routing: PathBuf,
    traces: Option<PathBuf>,
}

/// Write result files under `<dir>/topologies/<nodes>/` and
/// `<dir>/routing/<nodes>/`, named `<bits>bit_<unix_seconds>`.
fn write_outputs(
    output: &OutputSection,
    sim: &Simulation,
    traces: &[RouteTrace],
) -> Result<WrittenFiles> {
    let config = sim.config();
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before the unix epoch")?
        .as_secs();
    let prefix = format!("{}bit_{stamp}", config.id_bits);

    let topology_dir = output.dir.join("topologies").join(config.nodes.to_string());
    let routing_dir = output.dir.join("routing").join(config.nodes.to_string());
    std::fs::create_dir_all(&topology_dir).context("failed to create topology directory")?;
    std::fs::create_dir_all(&routing_dir).context("failed to create routing directory")?;

    let topology = topology_dir.join(format!("{prefix}.csv"));
    std::fs::write(&topology, sim.ring().topology_csv())
        .context("failed to write topology CSV")?;

    let routing = routing_dir.join(format!("{prefix}.csv"));
    std::fs::write(&routing, sim.stats().to_csv()).context("failed to write routing CSV")?;

    let traces_path = if output.traces {
        let path = routing_dir.join(format!("{prefix}_traces.json"));
        let json = serde_json::to_string_pretty(traces).context("failed to encode traces")?;
        std::fs::write(&path, json).context("failed to write trace dump")?;
        Some(path)
    } else {
        None
    };

    Ok(WrittenFiles {
        topology,
        routing,
        traces: traces_path,
    })
}

// -----------------------------------------------------------------------
// chordal topology
// -----------------------------------------------------------------------

fn cmd_topology(config: &CliConfig) -> Result<()> {
    let sim_config = SimConfig::new(config.simulation.id_bits, config.simulation.nodes);
    let mut rng = make_rng(config.simulation.seed);
    let sim = Simulation::build(sim_config, &mut rng).context("overlay construction failed")?;
    print!("{}", sim.ring().topology_csv());
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_simulate_flags() {
        let cli = Cli::try_parse_from([
            "chordal", "simulate", "--bits", "8", "--nodes", "4", "--seed", "9", "--traces",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                bits,
                nodes,
                seed,
                traces,
                ..
            } => {
                assert_eq!(bits, Some(8));
                assert_eq!(nodes, Some(4));
                assert_eq!(seed, Some(9));
                assert!(traces);
            }
            _ => panic!("expected simulate command"),
        }
    }

    #[test]
    fn test_cli_topology_defaults() {
        let cli = Cli::try_parse_from(["chordal", "topology"]).unwrap();
        match cli.command {
            Commands::Topology { bits, nodes, seed } => {
                assert_eq!(bits, None);
                assert_eq!(nodes, None);
                assert_eq!(seed, None);
            }
            _ => panic!("expected topology command"),
        }
    }

    #[test]
    fn test_write_outputs_places_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputSection {
            dir: dir.path().to_path_buf(),
            traces: true,
        };

        let mut rng = make_rng(Some(5));
        let mut sim = Simulation::build(SimConfig::new(16, 8), &mut rng).unwrap();
        let traces = sim.run(8, &mut rng);

        let written = write_outputs(&output, &sim, &traces).unwrap();
        assert!(written.topology.starts_with(dir.path().join("topologies").join("8")));
        assert!(written.routing.starts_with(dir.path().join("routing").join("8")));

        let topology = std::fs::read_to_string(&written.topology).unwrap();
        assert_eq!(topology.lines().count(), 8 * 16);

        let routing = std::fs::read_to_string(&written.routing).unwrap();
        assert!(routing.starts_with("avg_queries_per_node,"));

        let traces_json = std::fs::read_to_string(written.traces.unwrap()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&traces_json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 8);
        assert!(parsed[0]["hop_count"].is_u64());
    }

    #[test]
    fn test_write_outputs_skips_traces_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputSection {
            dir: dir.path().to_path_buf(),
            traces: false,
        };

        let mut rng = make_rng(Some(6));
        let mut sim = Simulation::build(SimConfig::new(8, 4), &mut rng).unwrap();
        let traces = sim.run(4, &mut rng);

        let written = write_outputs(&output, &sim, &traces).unwrap();
        assert!(written.traces.is_none());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = make_rng(Some(123));
        let mut b = make_rng(Some(123));
        let mut sim_a = Simulation::build(SimConfig::new(16, 8), &mut a).unwrap();
        let mut sim_b = Simulation::build(SimConfig::new(16, 8), &mut b).unwrap();
        sim_a.run(8, &mut a);
        sim_b.run(8, &mut b);
        assert_eq!(sim_a.stats().to_csv(), sim_b.stats().to_csv());
    }
}
