//! Binary configuration
//!
//! The `gleaner` binary takes its settings from an optional YAML file
//! with per-flag overrides on the command line.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Metric family name used when neither config file nor flag sets one.
pub const DEFAULT_METRIC_NAME: &str = "bench_result_val";

/// Errors produced while loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Wrapper around `std::io::Error`.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Config file did not deserialize.
    #[error("failed to deserialize config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Main configuration struct for the `gleaner` binary.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Name of the exported metric family.
    #[serde(default = "default_metric_name")]
    pub metric_name: String,
    /// Path of the benchmark result dump to derive from.
    pub input: PathBuf,
}

fn default_metric_name() -> String {
    DEFAULT_METRIC_NAME.to_string()
}

impl Config {
    /// Load a [`Config`] from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the file cannot be read or does not
    /// deserialize.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_default_metric_name() {
        let config: Config =
            serde_yaml::from_str("input: /var/run/benchmarks.json").expect("config parses");
        assert_eq!(config.metric_name, DEFAULT_METRIC_NAME);
        assert_eq!(config.input, PathBuf::from("/var/run/benchmarks.json"));
    }

    #[test]
    fn metric_name_override() {
        let config: Config =
            serde_yaml::from_str("input: b.json\nmetric_name: perf_val").expect("config parses");
        assert_eq!(config.metric_name, "perf_val");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<Config, _> = serde_yaml::from_str("input: b.json\nbogus: 1");
        assert!(parsed.is_err());
    }
}
