//! Result value shapes
//!
//! A benchmark result payload is a JSON object keyed by metric name.
//! Each value arrives in one of a closed set of structural shapes:
//! a bare number, a list of numbers, a list of labeled scalar entries,
//! or a list of labeled series entries. Classification is a decode
//! attempt -- try each known shape in order, keep the first structural
//! match. Anything else is invalid and skipped by the deriver.
//!
//! Lists that mix numbers and labeled objects fail every arm and are
//! treated as invalid; no partial batch is ever emitted.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;

/// One labeled entry carrying a single value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabeledValue {
    /// Arbitrary labels attached by the benchmark harness.
    #[serde(rename = "Labels")]
    pub labels: FxHashMap<String, String>,
    /// The sample itself.
    #[serde(rename = "Value")]
    pub value: f64,
}

/// One labeled entry carrying a whole series of values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabeledSeries {
    /// Arbitrary labels attached by the benchmark harness.
    #[serde(rename = "Labels")]
    pub labels: FxHashMap<String, String>,
    /// The samples. May be empty, in which case the deriver reports
    /// sentinel statistics.
    #[serde(rename = "Values")]
    pub values: Vec<f64>,
}

/// The closed set of result value shapes.
///
/// Arm order is the classification order: a list of labeled entries
/// where entries carry both `Value` and `Values` fields classifies as
/// [`ResultValue::LabeledValues`], matching the original collector's
/// precedence. Unknown extra fields on entries are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    /// A single number.
    Scalar(f64),
    /// An ordered list of numbers, emitted at positional indices.
    Sequence(Vec<f64>),
    /// A list of labeled scalar entries.
    LabeledValues(Vec<LabeledValue>),
    /// A list of labeled series entries, reduced to min/max/avg.
    SeriesValues(Vec<LabeledSeries>),
}

/// Why a raw value failed classification. All variants are non-fatal;
/// the deriver logs them and moves on to the next key.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An empty list carries no observations and no shape information.
    #[error("empty list carries no observations")]
    EmptySequence,
    /// The value looks like a labeled batch but does not decode as one,
    /// e.g. an entry is missing its `Value`/`Values` field.
    #[error("malformed labeled entries: {0}")]
    MalformedLabeled(serde_json::Error),
    /// Nothing in the closed shape set matches.
    #[error("unclassifiable value shape")]
    Unclassifiable,
}

/// Classify a raw decoded JSON value into its [`ResultValue`] shape.
///
/// # Errors
///
/// Returns an [`Error`] when the value is an empty list, a labeled batch
/// that does not decode, or any shape outside the closed set.
pub fn classify(raw: &Value) -> Result<ResultValue, Error> {
    // An empty JSON array would otherwise decode as an empty numeric
    // sequence; the original treats it as invalid.
    if let Value::Array(items) = raw {
        if items.is_empty() {
            return Err(Error::EmptySequence);
        }
    }

    match ResultValue::deserialize(raw) {
        Ok(value) => Ok(value),
        Err(err) if looks_labeled(raw) => Err(Error::MalformedLabeled(err)),
        Err(_) => Err(Error::Unclassifiable),
    }
}

/// True when the first list element is an object carrying a `Labels`
/// field, i.e. the author intended a labeled batch.
fn looks_labeled(raw: &Value) -> bool {
    raw.as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_object)
        .is_some_and(|entry| entry.contains_key("Labels"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_number_is_scalar() {
        assert_eq!(classify(&json!(1.5)).unwrap(), ResultValue::Scalar(1.5));
        // Integers classify as scalars too.
        assert_eq!(classify(&json!(3)).unwrap(), ResultValue::Scalar(3.0));
    }

    #[test]
    fn numeric_list_is_sequence() {
        assert_eq!(
            classify(&json!([1.0, 2.5, 3.0])).unwrap(),
            ResultValue::Sequence(vec![1.0, 2.5, 3.0])
        );
    }

    #[test]
    fn labeled_value_batch() {
        let raw = json!([{"Labels": {"pct": "99"}, "Value": 12.5}]);
        let ResultValue::LabeledValues(entries) = classify(&raw).unwrap() else {
            panic!("expected labeled values");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, 12.5);
        assert_eq!(entries[0].labels["pct"], "99");
    }

    #[test]
    fn labeled_series_batch() {
        let raw = json!([{"Labels": {"pct": "99"}, "Values": [1.0, 2.0, 3.0]}]);
        let ResultValue::SeriesValues(entries) = classify(&raw).unwrap() else {
            panic!("expected labeled series");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn value_wins_over_values_when_both_present() {
        let raw = json!([{"Labels": {}, "Value": 1.0, "Values": [2.0]}]);
        assert!(matches!(
            classify(&raw).unwrap(),
            ResultValue::LabeledValues(_)
        ));
    }

    #[test]
    fn empty_list_is_invalid() {
        assert!(matches!(classify(&json!([])), Err(Error::EmptySequence)));
    }

    #[test]
    fn bare_object_is_invalid() {
        // A labeled entry outside a list is not a recognized shape, even
        // with a Labels field.
        let raw = json!({"Labels": {"x": "y"}});
        assert!(matches!(classify(&raw), Err(Error::Unclassifiable)));
    }

    #[test]
    fn strings_and_bools_are_invalid() {
        assert!(matches!(classify(&json!("fast")), Err(Error::Unclassifiable)));
        assert!(matches!(classify(&json!(true)), Err(Error::Unclassifiable)));
        assert!(matches!(classify(&json!(null)), Err(Error::Unclassifiable)));
    }

    #[test]
    fn entry_missing_labels_is_invalid() {
        let raw = json!([{"Value": 1.0}]);
        assert!(matches!(classify(&raw), Err(Error::Unclassifiable)));
    }

    #[test]
    fn entry_missing_value_fields_is_malformed() {
        let raw = json!([{"Labels": {"x": "y"}}]);
        assert!(matches!(classify(&raw), Err(Error::MalformedLabeled(_))));
    }

    #[test]
    fn partially_malformed_batch_is_rejected_whole() {
        let raw = json!([
            {"Labels": {"pct": "50"}, "Value": 1.0},
            {"Labels": {"pct": "99"}}
        ]);
        assert!(matches!(classify(&raw), Err(Error::MalformedLabeled(_))));
    }

    #[test]
    fn heterogeneous_list_is_invalid() {
        let raw = json!([1.0, {"Labels": {"x": "y"}, "Value": 2.0}]);
        assert!(matches!(classify(&raw), Err(Error::Unclassifiable)));
    }

    #[test]
    fn extra_entry_fields_are_ignored() {
        let raw = json!([{"Labels": {}, "Value": 1.0, "Unit": "ms"}]);
        assert!(matches!(
            classify(&raw).unwrap(),
            ResultValue::LabeledValues(_)
        ));
    }
}
