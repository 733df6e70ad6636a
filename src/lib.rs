//! Clean-signal pattern analysis for partitioned tabular datasets.
//!
//! Partitions are concatenated into a [`data::Dataset`], rows whose
//! `noise_level` is zero are kept in time order as a [`data::CleanSubset`],
//! and the result is summarized on the console and rendered as PNG charts.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod report;
pub mod state;
pub mod stats;
