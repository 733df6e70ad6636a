use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Record – one row of a partition
// ---------------------------------------------------------------------------

/// A single measurement. Immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    /// Logical signal track the measurement belongs to.
    pub series_id: String,
    pub value: f64,
    /// 0.0 marks an unperturbed ("clean") measurement.
    pub noise_level: f64,
}

// ---------------------------------------------------------------------------
// Dataset – every partition concatenated
// ---------------------------------------------------------------------------

/// Row count contributed by one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    pub path: PathBuf,
    pub rows: usize,
}

/// All records in partition order, then original row order. Never mutated
/// after loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub partitions: Vec<PartitionInfo>,
}

impl Dataset {
    /// Concatenate partitions in the given order. No deduplication.
    pub fn from_partitions(parts: Vec<(PathBuf, Vec<Record>)>) -> Self {
        let total = parts.iter().map(|(_, rows)| rows.len()).sum();
        let mut records = Vec::with_capacity(total);
        let mut partitions = Vec::with_capacity(parts.len());

        for (path, rows) in parts {
            partitions.push(PartitionInfo {
                path,
                rows: rows.len(),
            });
            records.extend(rows);
        }

        Dataset {
            records,
            partitions,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CleanSubset – noise-free records in time order
// ---------------------------------------------------------------------------

/// Records that passed the noise filter, sorted ascending by timestamp.
/// Derived once per run and discarded after reporting.
#[derive(Debug, Clone, Default)]
pub struct CleanSubset {
    records: Vec<Record>,
}

impl CleanSubset {
    /// Stable-sort the given records by timestamp; ties keep their order.
    pub fn from_unsorted(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        CleanSubset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Series ids in order of first appearance (i.e. by earliest timestamp).
    pub fn series_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.series_id.as_str()))
            .map(|r| r.series_id.clone())
            .collect()
    }

    /// Series ids in lexicographic order.
    pub fn sorted_series_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.series_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Records of one series, still in time order.
    pub fn series<'a>(&'a self, series_id: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.series_id == series_id)
    }
}
