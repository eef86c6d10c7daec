//! TOML configuration for the chordal CLI.
//!
//! Every value has a default, so an absent or empty file is valid;
//! command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Overlay and query parameters.
    pub simulation: SimulationSection,
    /// Result file placement.
    pub output: OutputSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[simulation]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Identifier width in bits (positive multiple of 4, max 512).
    pub id_bits: u16,
    /// Number of nodes to place on the ring.
    pub nodes: usize,
    /// Number of lookups to replay. Defaults to the node count.
    pub queries: Option<usize>,
    /// RNG seed for reproducible runs. Random if omitted.
    pub seed: Option<u64>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            id_bits: 16,
            nodes: 64,
            queries: None,
            seed: None,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory under which `topologies/` and `routing/` are created.
    pub dir: PathBuf,
    /// Also dump every per-query trace as JSON.
    pub traces: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            traces: false,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective query count (config value or one per node).
    pub fn queries(&self) -> usize {
        self.simulation.queries.unwrap_or(self.simulation.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[simulation]
id_bits = 32
nodes = 500
queries = 1000
seed = 42

[output]
dir = "/tmp/chordal-out"
traces = true

[log]
level = "debug"
"#;
        let config = CliConfig::from_toml(toml).unwrap();
        assert_eq!(config.simulation.id_bits, 32);
        assert_eq!(config.simulation.nodes, 500);
        assert_eq!(config.queries(), 1000);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.output.dir, PathBuf::from("/tmp/chordal-out"));
        assert!(config.output.traces);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config.simulation.id_bits, 16);
        assert_eq!(config.simulation.nodes, 64);
        assert_eq!(config.queries(), 64, "queries default to the node count");
        assert!(config.simulation.seed.is_none());
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert!(!config.output.traces);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[simulation]
id_bits = 8
nodes = 4
"#;
        let config = CliConfig::from_toml(toml).unwrap();
        assert_eq!(config.simulation.id_bits, 8);
        assert_eq!(config.queries(), 4);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chordal.toml");
        std::fs::write(
            &path,
            r#"
[simulation]
nodes = 12
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.simulation.nodes, 12);
        assert_eq!(config.simulation.id_bits, 16);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.simulation.id_bits, 16);
    }
}
