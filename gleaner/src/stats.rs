//! Series summary statistics
//!
//! Labeled series are not exported element by element; they are reduced
//! to a min/max/avg triple. An empty series reduces to the sentinel
//! value -1 on all three fields rather than erroring, so a benchmark
//! that reported no samples still shows up when scraped.

/// Sentinel reported for all fields of a [`Summary`] over no samples.
pub const EMPTY_SENTINEL: f64 = -1.0;

/// Minimum, maximum and arithmetic mean of a numeric series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Smallest sample observed.
    pub min: f64,
    /// Largest sample observed.
    pub max: f64,
    /// Arithmetic mean of all samples.
    pub avg: f64,
}

impl Summary {
    /// Reduce a series in one linear pass.
    ///
    /// Empty input yields [`EMPTY_SENTINEL`] on every field.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let Some((&first, rest)) = values.split_first() else {
            return Self {
                min: EMPTY_SENTINEL,
                max: EMPTY_SENTINEL,
                avg: EMPTY_SENTINEL,
            };
        };

        let mut min = first;
        let mut max = first;
        let mut sum = first;
        for &value in rest {
            if value > max {
                max = value;
            } else if value < min {
                min = value;
            }
            sum += value;
        }

        Self {
            min,
            max,
            avg: sum / values.len() as f64,
        }
    }
}
