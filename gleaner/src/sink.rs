//! Observation sinks
//!
//! A derived observation is a single f64 under a fixed label set. The
//! deriver writes observations through the [`MetricSink`] trait, passed
//! in at construction rather than reached through any process-global
//! registry. Two sinks ship: [`ObservationSet`], an in-memory store
//! with deterministic Prometheus text rendering, and [`FacadeSink`],
//! which forwards observations as gauges to the installed `metrics`
//! recorder.

use metrics::gauge;
use rustc_hash::FxHashMap;

/// The fixed label set attached to every derived observation.
///
/// Variable per-entry label maps are flattened into the single `attrbs`
/// slot by [`crate::relabel::encode_labels`]; Prometheus-style systems
/// want a fixed label schema per metric family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationLabels {
    /// Benchmark name.
    pub benchmark: String,
    /// Build identifier.
    pub build: String,
    /// Configuration identifier.
    pub config: String,
    /// Scenario identifier.
    pub scenario: String,
    /// Job name.
    pub job: String,
    /// Pod name.
    pub pod: String,
    /// Normalized metric key.
    pub key: String,
    /// Positional index, encoded label string, or min/max/avg-suffixed
    /// encoded label string. Empty for bare scalars.
    pub attrbs: String,
}

impl ObservationLabels {
    const NAMES: [&'static str; 8] = [
        "benchmark",
        "build",
        "config",
        "scenario",
        "job",
        "pod",
        "key",
        "attrbs",
    ];

    fn values(&self) -> [&str; 8] {
        [
            &self.benchmark,
            &self.build,
            &self.config,
            &self.scenario,
            &self.job,
            &self.pod,
            &self.key,
            &self.attrbs,
        ]
    }

    /// Label pairs in the `metrics` facade's (name, value) form, in
    /// fixed schema order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        Self::NAMES
            .iter()
            .zip(self.values())
            .map(|(name, value)| ((*name).to_string(), value.to_string()))
            .collect()
    }
}

/// Accepts derived observations, one collection pass at a time.
pub trait MetricSink {
    /// Clear all observations. Called at the start of every pass so no
    /// stale series survive a source change.
    fn reset(&mut self);

    /// Record one observation, overwriting any prior value under the
    /// same labels.
    fn observe(&mut self, labels: ObservationLabels, value: f64);
}

/// In-memory observation store with Prometheus text rendering.
///
/// Reset-then-repopulate is exact here: after a pass the set holds
/// precisely the observations derived from the current source state.
#[derive(Debug, Default)]
pub struct ObservationSet {
    observations: FxHashMap<ObservationLabels, f64>,
}

impl ObservationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of observations currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when no observations are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Look up the value recorded under `labels`, if any.
    #[must_use]
    pub fn get(&self, labels: &ObservationLabels) -> Option<f64> {
        self.observations.get(labels).copied()
    }

    /// Iterate over all held observations in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObservationLabels, f64)> {
        self.observations.iter().map(|(labels, value)| (labels, *value))
    }

    /// Render the set in Prometheus text exposition format under
    /// `metric_name`. Series lines are sorted, so output for a given
    /// set of observations is deterministic.
    #[must_use]
    pub fn render(&self, metric_name: &str) -> String {
        let mut lines: Vec<String> = self
            .observations
            .iter()
            .map(|(labels, value)| {
                let rendered: Vec<String> = ObservationLabels::NAMES
                    .iter()
                    .zip(labels.values())
                    .map(|(name, label)| format!("{name}=\"{}\"", escape_label_value(label)))
                    .collect();
                format!("{metric_name}{{{}}} {value}", rendered.join(","))
            })
            .collect();
        lines.sort_unstable();

        let mut out = String::new();
        out.push_str(&format!(
            "# HELP {metric_name} Benchmark results with derived key and attribute labels\n"
        ));
        out.push_str(&format!("# TYPE {metric_name} gauge\n"));
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl MetricSink for ObservationSet {
    fn reset(&mut self) {
        self.observations.clear();
    }

    fn observe(&mut self, labels: ObservationLabels, value: f64) {
        self.observations.insert(labels, value);
    }
}

/// Escape a label value per the exposition format: backslash, double
/// quote and newline.
fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Forwards observations as gauges to the installed `metrics` recorder.
///
/// The facade cannot delete series, so `reset` is a no-op: live series
/// are overwritten on the next pass, while series absent from the new
/// source state persist at their last value until the process exits.
/// Use [`ObservationSet`] when exact reset semantics matter.
#[derive(Debug, Clone)]
pub struct FacadeSink {
    metric_name: String,
}

impl FacadeSink {
    /// Create a sink emitting gauges under `metric_name`.
    pub fn new<S: Into<String>>(metric_name: S) -> Self {
        Self {
            metric_name: metric_name.into(),
        }
    }
}

impl MetricSink for FacadeSink {
    fn reset(&mut self) {}

    fn observe(&mut self, labels: ObservationLabels, value: f64) {
        gauge!(self.metric_name.clone(), &labels.to_pairs()).set(value);
    }
}
