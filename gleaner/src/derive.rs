//! Deriving observations from benchmark results
//!
//! One collection pass walks every benchmark, run result and item the
//! source currently holds, parses each item's raw payload, classifies
//! each value's shape and expands it into observations on the sink.
//! Nothing in a pass is fatal: malformed payloads, unclassifiable
//! shapes and even a failed source listing are logged and counted, and
//! the pass completes with whatever could be derived.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{info, warn};

use crate::relabel::{encode_labels, relabel_key};
use crate::shape::{self, ResultValue};
use crate::sink::{MetricSink, ObservationLabels};
use crate::source::{Benchmark, ResultItem, ResultSource, RunResult};
use crate::stats::Summary;

/// Outcome counts for a single collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Observations written to the sink.
    pub observations: usize,
    /// Result items whose raw payload did not parse as a JSON object.
    pub skipped_items: usize,
    /// Keys whose value shape could not be derived.
    pub skipped_keys: usize,
    /// True when the source listing itself failed and the pass ran
    /// empty.
    pub source_failed: bool,
}

/// The identifying labels shared by every observation derived from one
/// result item.
struct Scope<'a> {
    benchmark: &'a str,
    result: &'a RunResult,
    item: &'a ResultItem,
}

impl Scope<'_> {
    fn labels(&self, key: &str, attrbs: String) -> ObservationLabels {
        ObservationLabels {
            benchmark: self.benchmark.to_string(),
            build: self.result.build_id.clone(),
            config: self.result.configuration_id.clone(),
            scenario: self.result.scenario_id.clone(),
            job: self.item.job_name.clone(),
            pod: self.item.pod_name.clone(),
            key: key.to_string(),
            attrbs,
        }
    }
}

/// Derives labeled observations from benchmark results into a sink.
///
/// The sink is an explicit dependency handed over at construction. A
/// pass resets the sink before repopulating it; callers that need
/// snapshot consistency must serialize passes against reads.
#[derive(Debug)]
pub struct Deriver<S> {
    sink: S,
}

impl<S: MetricSink> Deriver<S> {
    /// Create a deriver writing into `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Borrow the sink, e.g. to render after a pass.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the deriver, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one collection pass over `source`.
    ///
    /// Resets the sink, lists the source fresh and derives observations
    /// for every result item. Never fails; all trouble is logged and
    /// tallied in the returned [`PassSummary`].
    pub fn pass<R: ResultSource>(&mut self, source: &R) -> PassSummary {
        let mut summary = PassSummary::default();
        self.sink.reset();

        let benchmarks = match source.list() {
            Ok(benchmarks) => benchmarks,
            Err(err) => {
                warn!("failed to list benchmark results: {err}");
                summary.source_failed = true;
                return summary;
            }
        };

        for benchmark in &benchmarks {
            info!(
                benchmark = %benchmark.name,
                results = benchmark.results.len(),
                "collecting benchmark results"
            );
            for result in &benchmark.results {
                for item in &result.items {
                    self.derive_item(benchmark, result, item, &mut summary);
                }
            }
        }
        summary
    }

    fn derive_item(
        &mut self,
        benchmark: &Benchmark,
        result: &RunResult,
        item: &ResultItem,
        summary: &mut PassSummary,
    ) {
        let values: FxHashMap<String, Value> = match serde_json::from_str(&item.result) {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    benchmark = %benchmark.name,
                    job = %item.job_name,
                    pod = %item.pod_name,
                    "cannot parse result payload: {err}"
                );
                summary.skipped_items += 1;
                return;
            }
        };

        let scope = Scope {
            benchmark: &benchmark.name,
            result,
            item,
        };

        for (raw_key, raw_value) in &values {
            let key = relabel_key(raw_key);
            match shape::classify(raw_value) {
                Ok(ResultValue::Scalar(value)) => {
                    self.sink.observe(scope.labels(&key, String::new()), value);
                    summary.observations += 1;
                }
                Ok(ResultValue::Sequence(elements)) => {
                    for (index, value) in elements.iter().enumerate() {
                        self.sink.observe(scope.labels(&key, index.to_string()), *value);
                        summary.observations += 1;
                    }
                }
                Ok(ResultValue::LabeledValues(entries)) => {
                    for entry in entries {
                        let attrbs = encode_labels(&entry.labels);
                        self.sink.observe(scope.labels(&key, attrbs), entry.value);
                        summary.observations += 1;
                    }
                }
                Ok(ResultValue::SeriesValues(entries)) => {
                    for entry in entries {
                        let encoded = encode_labels(&entry.labels);
                        let stats = Summary::of(&entry.values);
                        self.sink
                            .observe(scope.labels(&key, format!("{encoded}_min")), stats.min);
                        self.sink
                            .observe(scope.labels(&key, format!("{encoded}_max")), stats.max);
                        self.sink
                            .observe(scope.labels(&key, format!("{encoded}_avg")), stats.avg);
                        summary.observations += 3;
                    }
                }
                Err(err) => {
                    warn!(
                        benchmark = %benchmark.name,
                        job = %item.job_name,
                        key = %key,
                        "skipping result value: {err}"
                    );
                    summary.skipped_keys += 1;
                }
            }
        }
    }
}
