use std::path::{Path, PathBuf};

use clap::Parser;

use crate::chart::ChartOptions;
use crate::data::filter::NoiseFilter;

pub const DEFAULT_DATASET_DIR: &str = "dataset";
pub const DEFAULT_PARTITIONS: u32 = 5;

// ── Args (CLI) ────────────────────────────────────────────────────────────────

/// Hunt for patterns in the clean (noise-free) part of a partitioned dataset
#[derive(Parser, Debug, Clone)]
#[command(name = "pattern-probe", version)]
pub struct Args {
    /// Directory holding dataset_part_<n>.csv partitions
    #[arg(long, default_value = DEFAULT_DATASET_DIR)]
    pub dataset_dir: PathBuf,

    /// Number of partitions to read (dataset_part_1 … dataset_part_N)
    #[arg(long, default_value_t = DEFAULT_PARTITIONS, value_parser = clap::value_parser!(u32).range(1..))]
    pub partitions: u32,

    /// Explicit partition files, read in the order given; overrides
    /// --dataset-dir and --partitions
    #[arg(long = "input", value_name = "FILE", num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Where the PNG charts are written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Resolution of the PNG charts
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(10..=600))]
    pub dpi: u32,

    /// Number of equal-width time windows in the window chart
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    pub windows: u32,

    /// Vertical offset between rows of the stacked chart
    #[arg(long, default_value_t = 12.0)]
    pub stack_offset: f64,

    /// Treat |noise_level| <= EPS as clean instead of requiring exactly 0
    #[arg(long, value_name = "EPS", value_parser = parse_tolerance)]
    pub noise_tolerance: Option<f64>,

    /// Print statistics only; skip chart rendering
    #[arg(long)]
    pub stats_only: bool,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let eps: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if eps.is_finite() && eps >= 0.0 {
        Ok(eps)
    } else {
        Err(format!("tolerance must be a finite number >= 0, got {s}"))
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Resolved settings for one run. `Default` is the fixed five-partition
/// layout with exact noise matching and both charts rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub partitions: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub filter: NoiseFilter,
    pub charts: ChartOptions,
    pub render_charts: bool,
}

/// `dir/dataset_part_1.csv` … `dir/dataset_part_<count>.csv`.
pub fn default_partitions(dir: &Path, count: u32) -> Vec<PathBuf> {
    (1..=count)
        .map(|i| dir.join(format!("dataset_part_{i}.csv")))
        .collect()
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            partitions: default_partitions(Path::new(DEFAULT_DATASET_DIR), DEFAULT_PARTITIONS),
            output_dir: PathBuf::from("."),
            filter: NoiseFilter::Exact,
            charts: ChartOptions::default(),
            render_charts: true,
        }
    }
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        let partitions = if args.inputs.is_empty() {
            default_partitions(&args.dataset_dir, args.partitions)
        } else {
            args.inputs
        };
        RunConfig {
            partitions,
            output_dir: args.output_dir,
            filter: args
                .noise_tolerance
                .map_or(NoiseFilter::Exact, NoiseFilter::Tolerance),
            charts: ChartOptions {
                dpi: args.dpi,
                windows: args.windows as usize,
                stack_offset: args.stack_offset,
            },
            render_charts: !args.stats_only,
        }
    }
}
