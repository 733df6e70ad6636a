use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Write a deterministic synthetic dataset split into CSV partitions
#[derive(Parser, Debug)]
struct Args {
    /// Output directory for dataset_part_<n>.csv
    #[arg(long, default_value = "dataset")]
    out_dir: PathBuf,

    /// Number of partitions
    #[arg(long, default_value_t = 5)]
    partitions: usize,

    /// Total rows across all partitions
    #[arg(long, default_value_t = 1000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    timestamp: String,
    series_id: &'a str,
    value: f64,
    noise_level: f64,
}

const SERIES: [&str; 3] = ["stroke_a", "stroke_b", "stroke_c"];
const NOISE_LEVELS: [f64; 3] = [0.1, 0.25, 0.5];
/// Fraction of rows written without perturbation.
const CLEAN_FRACTION: f64 = 0.3;

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Discrete "stroke" level a series sits on at step `i`: plateaus of seven
/// steps on the even numbers 0..=10, phase-shifted per series.
fn stroke_level(i: usize, series: usize) -> f64 {
    2.0 * ((i / 7 + series * 2) % 6) as f64
}

fn main() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.partitions > 0, "need at least one partition");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut writers = (1..=args.partitions)
        .map(|n| {
            let path = args.out_dir.join(format!("dataset_part_{n}.csv"));
            csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut clean = 0usize;
    for i in 0..args.rows {
        let series = i % SERIES.len();
        let level = stroke_level(i, series);
        let (value, noise_level) = if rng.gen_bool(CLEAN_FRACTION) {
            clean += 1;
            (level, 0.0)
        } else {
            let noise = NOISE_LEVELS[rng.gen_range(0..NOISE_LEVELS.len())];
            (level + gauss(&mut rng, 0.0, noise * 10.0), noise)
        };

        let ts = start + Duration::seconds(30 * i as i64);
        // Round-robin: concatenating the partitions does not give time order.
        writers[i % args.partitions].serialize(Row {
            timestamp: ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            series_id: SERIES[series],
            value,
            noise_level,
        })?;
    }

    for w in &mut writers {
        w.flush()?;
    }

    println!(
        "Wrote {} rows ({clean} clean) across {} partitions to {}",
        args.rows,
        args.partitions,
        args.out_dir.display()
    );
    Ok(())
}
