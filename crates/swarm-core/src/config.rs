//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `swarm-config.yaml` at the
//! project root. This module defines strongly-typed structs mirroring
//! the YAML structure and a loader that reads the file, falling back to
//! defaults when it is absent. Simulation semantics are configured only
//! here, at construction time -- nothing is runtime-mutable.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `swarm-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SwarmConfig {
    /// World construction parameters.
    #[serde(default)]
    pub world: WorldConfig,

    /// Observer server bind settings.
    #[serde(default)]
    pub server: ServerSettings,
}

impl SwarmConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(yaml)
    }
}

/// World construction parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Roster size; fixed for the lifetime of an environment.
    pub num_agents: usize,

    /// Side length of the square arena, in world units.
    pub environment_size: f64,

    /// Seed for the world's random source. Unset draws one from the OS;
    /// a fixed value makes initialization and physics deterministic.
    pub seed: Option<u64>,

    /// Driver cadence in milliseconds (16 ms is roughly 60 steps/sec).
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            num_agents: 100,
            environment_size: 200.0,
            seed: None,
            tick_interval_ms: 16,
        }
    }
}

/// Observer server bind settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host address to bind (e.g. `0.0.0.0`).
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SwarmConfig::default();
        assert_eq!(config.world.num_agents, 100);
        assert_eq!(config.world.environment_size, 200.0);
        assert_eq!(config.world.seed, None);
        assert_eq!(config.world.tick_interval_ms, 16);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn parses_partial_yaml_with_defaults() {
        let yaml = r"
world:
  num_agents: 25
  seed: 7
";
        let config = SwarmConfig::parse(yaml).unwrap();
        assert_eq!(config.world.num_agents, 25);
        assert_eq!(config.world.seed, Some(7));
        // Unlisted fields keep their defaults.
        assert_eq!(config.world.environment_size, 200.0);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r"
world:
  num_agents: 10
  environment_size: 100.0
  seed: 42
  tick_interval_ms: 20
server:
  host: 127.0.0.1
  port: 9100
";
        let config = SwarmConfig::parse(yaml).unwrap();
        assert_eq!(config.world.environment_size, 100.0);
        assert_eq!(config.world.tick_interval_ms, 20);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(SwarmConfig::parse("world: [not, a, map]").is_err());
    }
}
