//! Derive Prometheus-style metrics from benchmark result payloads.
//!
//! Benchmark harnesses report their results as loosely-typed JSON objects
//! keyed by metric name: a key's value may be a bare number, a list of
//! numbers, or a list of labeled entries carrying one value or a whole
//! series. This library classifies each value's shape and expands it into
//! labeled numeric observations ready for scraping. The `gleaner` binary
//! runs a single collection pass over a result dump on disk and renders
//! the derived observations in Prometheus text exposition format.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::perf)]
#![deny(clippy::suspicious)]
#![deny(clippy::complexity)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod derive;
pub mod relabel;
pub mod shape;
pub mod sink;
pub mod source;
pub mod stats;
