//! Metric key and label normalization
//!
//! Benchmark payloads use free-form key names -- "Latency (ms)",
//! "Ops/sec", "CPU %" -- and attach arbitrary label maps to entries.
//! Prometheus label values want something tamer. This module flattens
//! both into stable lowercase strings.

use rustc_hash::FxHashMap;

/// Normalize a raw metric key for use as a label value.
///
/// Lowercases and rewrites characters that read poorly in a label:
/// spaces and `(` become `_`, `/` becomes `_per_`, `)` is dropped, `%`
/// becomes `_percent`. Doubled underscores are collapsed in a single
/// non-recursive pass.
#[must_use]
pub fn relabel_key(key: &str) -> String {
    key.to_lowercase()
        .replace(' ', "_")
        .replace('(', "_")
        .replace('/', "_per_")
        .replace(')', "")
        .replace('%', "_percent")
        .replace("__", "_")
}

/// Flatten an arbitrary label map into one deterministic string.
///
/// Keys are sorted lexicographically and concatenated as `"{key}_{value} "`
/// pairs joined by `_`, lowercased. The trailing space per pair is part of
/// the format: downstream attribute strings append suffixes like `_min`
/// directly, producing e.g. `pct_99 _min`. Encoding depends only on map
/// contents, never on iteration order.
#[must_use]
pub fn encode_labels(labels: &FxHashMap<String, String>) -> String {
    let mut keys: Vec<&String> = labels.keys().collect();
    keys.sort_unstable();

    let mut out = String::new();
    for (index, key) in keys.iter().enumerate() {
        if index > 0 {
            out.push('_');
        }
        out.push_str(key);
        out.push('_');
        out.push_str(&labels[*key]);
        out.push(' ');
    }
    out.to_lowercase()
}
