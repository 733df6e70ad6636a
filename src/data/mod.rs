/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  dataset_part_1.csv … dataset_part_N.csv  (.json / .parquet also accepted)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse partitions, timestamps → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, partition order then row order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  noise_level == 0 → stable sort by time → CleanSubset
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod timestamp;

pub use error::IngestError;
pub use filter::{clean_subset, NoiseFilter};
pub use loader::load_partitions;
pub use model::{CleanSubset, Dataset, Record};
