use std::io::Write;
use std::path::{Path, PathBuf};

use pattern_probe::app::PatternProbeApp;
use pattern_probe::config::RunConfig;
use pattern_probe::data::{clean_subset, load_partitions, NoiseFilter};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

const HEADER: &str = "timestamp,series_id,value,noise_level";

fn write_partition(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    path
}

fn stats_only(partitions: Vec<PathBuf>, output_dir: &Path) -> RunConfig {
    RunConfig {
        partitions,
        output_dir: output_dir.to_path_buf(),
        render_charts: false,
        ..RunConfig::default()
    }
}

fn run_to_string(config: RunConfig) -> String {
    let mut out = Vec::<u8>::new();
    PatternProbeApp::new(config).run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_single_file_example() {
    let dir = TempDir::new().unwrap();
    let part = write_partition(dir.path(), "p1.csv", &["1,S,5.0,0.0", "2,S,6.0,0.1"]);

    let mut out = Vec::<u8>::new();
    let summary = PatternProbeApp::new(stats_only(vec![part], dir.path()))
        .run(&mut out)
        .unwrap();

    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.clean_rows, 1);
    assert_eq!(summary.stats.min, 5.0);
    assert_eq!(summary.stats.max, 5.0);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Total rows: 2\nClean rows (noise=0): 1\n"));
    assert!(text.contains("Value range: 5.00 to 5.00"));
}

#[test]
fn test_partitions_concatenate_without_dedup() {
    let dir = TempDir::new().unwrap();
    let row = "2024-01-01 00:00:00,A,1.0,0.0";
    let sizes = [3usize, 0, 2, 4];
    let paths: Vec<PathBuf> = sizes
        .iter()
        .enumerate()
        .map(|(i, &n)| write_partition(dir.path(), &format!("p{i}.csv"), &vec![row; n]))
        .collect();

    let dataset = load_partitions(&paths).unwrap();
    assert_eq!(dataset.len(), sizes.iter().sum::<usize>());
    let rows: Vec<usize> = dataset.partitions.iter().map(|p| p.rows).collect();
    assert_eq!(rows, sizes.to_vec());
}

#[test]
fn test_clean_subset_spans_partitions_in_time_order() {
    let dir = TempDir::new().unwrap();
    let a = write_partition(
        dir.path(),
        "a.csv",
        &[
            "2024-01-01 00:00:04,A,4.0,0.0",
            "2024-01-01 00:00:02,A,2.0,0.5",
        ],
    );
    let b = write_partition(
        dir.path(),
        "b.csv",
        &[
            "2024-01-01 00:00:01,B,1.0,0.0",
            "2024-01-01 00:00:04,B,40.0,0.0",
            "2024-01-01 00:00:03,B,3.0,0.0",
        ],
    );

    let dataset = load_partitions(&[a, b]).unwrap();
    let clean = clean_subset(&dataset, &NoiseFilter::Exact);

    assert_eq!(clean.values(), vec![1.0, 3.0, 4.0, 40.0]);
    assert!(clean.records().iter().all(|r| r.noise_level == 0.0));
    assert!(clean.len() < dataset.len());
    assert_eq!(clean.series_ids(), vec!["B", "A"]);
}

#[test]
fn test_console_output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<String> = (0..50)
        .map(|i| {
            format!(
                "2024-01-01T00:{:02}:{:02},S{},{}.{},{}",
                i / 60,
                i % 60,
                i % 3,
                i % 11,
                i % 7,
                if i % 4 == 0 { "0.1" } else { "0.0" }
            )
        })
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let part = write_partition(dir.path(), "p.csv", &row_refs);

    let first = run_to_string(stats_only(vec![part.clone()], dir.path()));
    let second = run_to_string(stats_only(vec![part], dir.path()));
    assert_eq!(first, second);
    assert!(first.contains("Most common value levels:"));
}

#[test]
fn test_stats_only_writes_no_images() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("out");
    let part = write_partition(dir.path(), "p.csv", &["2024-01-01,A,1.0,0.0"]);

    let text = run_to_string(stats_only(vec![part], &out_dir));
    assert!(!text.contains("Creating visualizations"));
    assert!(!text.contains("Saved:"));
    assert!(!out_dir.exists());
}

#[test]
fn test_missing_partition_fails_run() {
    let dir = TempDir::new().unwrap();
    let present = write_partition(dir.path(), "p1.csv", &["2024-01-01,A,1.0,0.0"]);
    let config = stats_only(vec![present, dir.path().join("p2.csv")], dir.path());

    let err = PatternProbeApp::new(config)
        .run(&mut Vec::<u8>::new())
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("loading dataset partitions"));
    assert!(chain.contains("partition not found"));
}

#[test]
fn test_unparseable_timestamp_fails_run() {
    let dir = TempDir::new().unwrap();
    let part = write_partition(dir.path(), "p1.csv", &["someday,A,1.0,0.0"]);

    let err = PatternProbeApp::new(stats_only(vec![part], dir.path()))
        .run(&mut Vec::<u8>::new())
        .unwrap_err();
    assert!(format!("{err:#}").contains("cannot parse timestamp 'someday'"));
}

#[test]
fn test_tolerance_filter_widens_subset() {
    let dir = TempDir::new().unwrap();
    let part = write_partition(
        dir.path(),
        "p.csv",
        &["2024-01-01,A,1.0,0.0", "2024-01-02,A,2.0,1e-12", "2024-01-03,A,3.0,0.2"],
    );

    let exact = run_to_string(stats_only(vec![part.clone()], dir.path()));
    assert!(exact.contains("Clean rows (noise=0): 1"));

    let config = RunConfig {
        filter: NoiseFilter::Tolerance(1e-9),
        ..stats_only(vec![part], dir.path())
    };
    let tolerant = run_to_string(config);
    assert!(tolerant.contains("Clean rows (|noise|<=0.000000001): 2"));
}
