use std::io::{self, Write};

use crate::data::filter::NoiseFilter;
use crate::data::model::{CleanSubset, Dataset};
use crate::stats::{value_levels, ValueSummary};

/// How many value levels the console report lists.
pub const TOP_LEVELS: usize = 5;

// ---------------------------------------------------------------------------
// Console summary
// ---------------------------------------------------------------------------

/// Everything printed to stdout about one run. Built only from the data, so
/// identical inputs always print identical text.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_rows: usize,
    pub clean_rows: usize,
    pub filter: NoiseFilter,
    /// Series ids in order of first appearance in the clean subset.
    pub series: Vec<String>,
    pub stats: ValueSummary,
    pub levels: Vec<(f64, usize)>,
}

impl RunSummary {
    pub fn new(dataset: &Dataset, clean: &CleanSubset, filter: NoiseFilter) -> Self {
        let values = clean.values();
        RunSummary {
            total_rows: dataset.len(),
            clean_rows: clean.len(),
            filter,
            series: clean.series_ids(),
            stats: ValueSummary::from_values(&values),
            levels: value_levels(&values, TOP_LEVELS),
        }
    }

    /// Row counts and the series list.
    pub fn write_counts(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Total rows: {}", self.total_rows)?;
        writeln!(out, "Clean rows ({}): {}", self.filter, self.clean_rows)?;
        writeln!(out, "Unique series: {:?}", self.series)
    }

    /// Value statistics, range and most common levels.
    pub fn write_statistics(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "\nValue statistics:")?;
        writeln!(out, "{}", self.stats)?;
        writeln!(
            out,
            "\nValue range: {:.2} to {:.2}",
            self.stats.min, self.stats.max
        )?;
        writeln!(out, "\nMost common value levels:")?;
        for (level, count) in &self.levels {
            writeln!(out, "{level:>8.1}  {count:>6}")?;
        }
        Ok(())
    }
}
