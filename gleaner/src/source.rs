//! Benchmark result records and where they come from
//!
//! The deriver does not care who ran the benchmarks. It consumes an
//! ordered collection of [`Benchmark`] records through the
//! [`ResultSource`] trait and re-reads the source fresh on every
//! collection pass. [`FileSource`] loads a result dump from disk for
//! the `gleaner` binary; [`StaticSource`] serves a fixed collection,
//! mainly for tests.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// One result item reported by a single pod of a benchmark job.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultItem {
    /// Name of the job that produced this item.
    pub job_name: String,
    /// Name of the pod that produced this item.
    pub pod_name: String,
    /// Raw JSON-encoded result payload, an object keyed by metric name.
    /// Kept as a string here; the deriver parses it per pass and skips
    /// items that fail to parse.
    pub result: String,
}

/// Results of one benchmark run against a particular build and
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunResult {
    /// Identifier of the build under test.
    pub build_id: String,
    /// Identifier of the benchmark configuration.
    pub configuration_id: String,
    /// Identifier of the scenario within the configuration.
    pub scenario_id: String,
    /// Per-pod result items.
    #[serde(default)]
    pub items: Vec<ResultItem>,
}

/// A named benchmark and all run results recorded for it.
#[derive(Debug, Clone, Deserialize)]
pub struct Benchmark {
    /// Benchmark name, used as the `benchmark` label on every derived
    /// observation.
    pub name: String,
    /// Recorded run results.
    #[serde(default)]
    pub results: Vec<RunResult>,
}

/// Errors produced by result sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Wrapper around `std::io::Error`.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Dump did not deserialize as JSON.
    #[error("failed to deserialize benchmark dump: {0}")]
    Json(#[from] serde_json::Error),
    /// Dump did not deserialize as YAML.
    #[error("failed to deserialize benchmark dump: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Supplies benchmark records to the deriver, fresh on every call.
pub trait ResultSource {
    /// List all benchmark records currently known to the source.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error`] when the backing store cannot be
    /// read or decoded. The deriver treats this as a diagnostic and
    /// completes the pass empty.
    fn list(&self) -> Result<Vec<Benchmark>, Error>;
}

/// A fixed in-memory collection of benchmark records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    benchmarks: Vec<Benchmark>,
}

impl StaticSource {
    /// Create a source serving exactly `benchmarks` on every pass.
    #[must_use]
    pub fn new(benchmarks: Vec<Benchmark>) -> Self {
        Self { benchmarks }
    }
}

impl ResultSource for StaticSource {
    fn list(&self) -> Result<Vec<Benchmark>, Error> {
        Ok(self.benchmarks.clone())
    }
}

/// Loads a benchmark result dump from disk on every pass.
///
/// The dump is a list of [`Benchmark`] records. Files with a `.yaml` or
/// `.yml` extension are decoded as YAML, everything else as JSON.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source backed by the dump at `path`. The file is not
    /// touched until the first pass.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSource for FileSource {
    fn list(&self) -> Result<Vec<Benchmark>, Error> {
        let contents = fs::read_to_string(&self.path)?;
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&contents)?),
            _ => Ok(serde_json::from_str(&contents)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DUMP: &str = r#"
    [
      {
        "name": "sysbench",
        "results": [
          {
            "build_id": "v1.2.3",
            "configuration_id": "cfg-a",
            "scenario_id": "s1",
            "items": [
              {
                "job_name": "sysbench-job",
                "pod_name": "sysbench-job-abc12",
                "result": "{\"throughput\": 991.2}"
              }
            ]
          }
        ]
      }
    ]
    "#;

    #[test]
    fn static_source_round_trips() {
        let benchmarks: Vec<Benchmark> = serde_json::from_str(DUMP).expect("dump parses");
        let source = StaticSource::new(benchmarks);
        let listed = source.list().expect("list succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "sysbench");
        assert_eq!(listed[0].results[0].build_id, "v1.2.3");
        assert_eq!(listed[0].results[0].items[0].pod_name, "sysbench-job-abc12");
    }

    #[test]
    fn results_and_items_default_empty() {
        let benchmark: Benchmark =
            serde_json::from_str(r#"{"name": "empty"}"#).expect("benchmark parses");
        assert!(benchmark.results.is_empty());
    }

    #[test]
    fn file_source_reads_json() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("create tempfile");
        file.write_all(DUMP.as_bytes()).expect("write dump");
        let source = FileSource::new(file.path());
        let listed = source.list().expect("list succeeds");
        assert_eq!(listed[0].name, "sysbench");
    }

    #[test]
    fn file_source_reads_yaml_by_extension() {
        let yaml = r#"
- name: iperf
  results:
    - build_id: "42"
      configuration_id: net
      scenario_id: tcp
      items:
        - job_name: iperf-job
          pod_name: iperf-job-0
          result: '{"bandwidth": 10.5}'
"#;
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("create tempfile");
        file.write_all(yaml.as_bytes()).expect("write dump");
        let source = FileSource::new(file.path());
        let listed = source.list().expect("list succeeds");
        assert_eq!(listed[0].name, "iperf");
        assert_eq!(listed[0].results[0].items[0].job_name, "iperf-job");
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = FileSource::new("/nonexistent/benchmarks.json");
        assert!(matches!(source.list(), Err(Error::Io(_))));
    }
}
