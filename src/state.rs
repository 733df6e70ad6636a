use log::{info, warn};

use crate::data::filter::{clean_subset, NoiseFilter};
use crate::data::model::{CleanSubset, Dataset};
use crate::report::RunSummary;

// ---------------------------------------------------------------------------
// Analysis state
// ---------------------------------------------------------------------------

/// The loaded dataset and the clean subset derived from it. Built once per
/// run; nothing here is mutated after construction.
pub struct AnalysisState {
    pub dataset: Dataset,
    pub filter: NoiseFilter,
    pub clean: CleanSubset,
}

impl AnalysisState {
    /// Ingest a freshly loaded dataset and derive its clean subset.
    pub fn new(dataset: Dataset, filter: NoiseFilter) -> Self {
        let clean = clean_subset(&dataset, &filter);
        info!(
            "{} of {} rows pass the noise filter ({filter})",
            clean.len(),
            dataset.len()
        );
        if clean.is_empty() {
            warn!("no clean rows; charts will be empty");
        }
        AnalysisState {
            dataset,
            filter,
            clean,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::new(&self.dataset, &self.clean, self.filter)
    }
}
