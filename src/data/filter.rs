use std::fmt;

use super::model::{CleanSubset, Dataset};

// ---------------------------------------------------------------------------
// Noise predicate
// ---------------------------------------------------------------------------

/// Decides whether a record's `noise_level` marks a clean measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NoiseFilter {
    /// `noise_level == 0.0` with IEEE equality: `-0.0` passes, NaN never does.
    #[default]
    Exact,
    /// `|noise_level| <= eps`.
    Tolerance(f64),
}

impl NoiseFilter {
    pub fn accepts(&self, noise_level: f64) -> bool {
        match *self {
            NoiseFilter::Exact => noise_level == 0.0,
            NoiseFilter::Tolerance(eps) => noise_level.abs() <= eps,
        }
    }
}

impl fmt::Display for NoiseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseFilter::Exact => write!(f, "noise=0"),
            NoiseFilter::Tolerance(eps) => write!(f, "|noise|<={eps}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Indices (into `dataset.records`) of records that pass the filter, in
/// dataset order.
pub fn clean_indices(dataset: &Dataset, filter: &NoiseFilter) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.accepts(r.noise_level))
        .map(|(i, _)| i)
        .collect()
}

/// Linear scan for clean records followed by a stable sort by timestamp.
pub fn clean_subset(dataset: &Dataset, filter: &NoiseFilter) -> CleanSubset {
    let selected = clean_indices(dataset, filter)
        .into_iter()
        .map(|i| dataset.records[i].clone())
        .collect();
    CleanSubset::from_unsorted(selected)
}
