use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit};
use chrono::NaiveDateTime;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::IngestError;
use super::model::{Dataset, Record};
use super::timestamp::{from_epoch_nanos, parse_timestamp};

/// Columns every partition must provide, whatever its format.
pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "series_id", "value", "noise_level"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every partition in order and concatenate them.
///
/// The first missing or malformed partition aborts the whole load.
pub fn load_partitions(paths: &[PathBuf]) -> Result<Dataset, IngestError> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        let records = load_file(path)?;
        info!("loaded {} rows from {}", records.len(), path.display());
        parts.push((path.clone(), records));
    }
    Ok(Dataset::from_partitions(parts))
}

/// Load a single partition.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four required columns (any order)
/// * `.json`    – `[{ "timestamp": ..., "series_id": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<Vec<Record>, IngestError> {
    if !path.is_file() {
        return Err(IngestError::MissingPartition(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    debug!("reading {} as .{ext}", path.display());

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            ext,
        }),
    }
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

fn make_record(
    path: &Path,
    row: usize,
    timestamp: Option<NaiveDateTime>,
    raw_timestamp: impl FnOnce() -> String,
    series_id: String,
    value: Option<f64>,
    noise_level: Option<f64>,
) -> Result<Record, IngestError> {
    let timestamp = timestamp.ok_or_else(|| IngestError::Timestamp {
        path: path.to_path_buf(),
        row,
        text: raw_timestamp(),
    })?;
    Ok(Record {
        timestamp,
        series_id,
        // Empty numeric cells read as NaN, never as zero.
        value: value.unwrap_or(f64::NAN),
        noise_level: noise_level.unwrap_or(f64::NAN),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    series_id: String,
    value: Option<f64>,
    noise_level: Option<f64>,
}

/// CSV layout: header row with column names, extra columns ignored.
fn load_csv(path: &Path) -> Result<Vec<Record>, IngestError> {
    let csv_err = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(csv_err)?;
        let ts = parse_timestamp(&row.timestamp);
        records.push(make_record(
            path,
            row_no,
            ts,
            || row.timestamp.clone(),
            row.series_id,
            row.value,
            row.noise_level,
        )?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented layout (`df.to_json(orient='records')`). Timestamps may
/// be strings or integer epoch nanoseconds.
#[derive(Debug, Deserialize)]
struct JsonRow {
    timestamp: JsonValue,
    series_id: String,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    noise_level: Option<f64>,
}

fn load_json(path: &Path) -> Result<Vec<Record>, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<JsonRow> = serde_json::from_str(&text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    rows.into_iter()
        .enumerate()
        .map(|(row_no, row)| {
            let ts = match &row.timestamp {
                JsonValue::String(s) => parse_timestamp(s),
                JsonValue::Number(n) => n.as_i64().and_then(from_epoch_nanos),
                _ => None,
            };
            let raw = &row.timestamp;
            make_record(
                path,
                row_no,
                ts,
                || raw.to_string(),
                row.series_id,
                row.value,
                row.noise_level,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet partition.
///
/// Expected schema:
/// - `timestamp`: Utf8 / LargeUtf8 text, Int64 epoch nanoseconds, or an
///   Arrow `Timestamp` of any unit
/// - `series_id`: Utf8 / LargeUtf8, or any numeric type (rendered as text)
/// - `value`, `noise_level`: any numeric type; nulls become NaN
fn load_parquet(path: &Path) -> Result<Vec<Record>, IngestError> {
    let parquet_err = |source| IngestError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_err = |source| IngestError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(arrow_err)?;
        let schema = batch.schema();
        let offset = records.len();

        let column = |name: &'static str| -> Result<&ArrayRef, IngestError> {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| IngestError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };

        let timestamps = extract_timestamps(path, column("timestamp")?, offset)?;
        let series = extract_strings(path, column("series_id")?, "series_id", offset)?;
        let values = extract_f64s(path, column("value")?, "value")?;
        let noise = extract_f64s(path, column("noise_level")?, "noise_level")?;

        records.extend(
            timestamps
                .into_iter()
                .zip(series)
                .zip(values.into_iter().zip(noise))
                .map(|((timestamp, series_id), (value, noise_level))| Record {
                    timestamp,
                    series_id,
                    value,
                    noise_level,
                }),
        );
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column_type_error(path: &Path, column: &'static str, found: &DataType) -> IngestError {
    IngestError::ColumnType {
        path: path.to_path_buf(),
        column,
        found: format!("{found:?}"),
    }
}

fn null_error(path: &Path, column: &'static str, row: usize) -> IngestError {
    IngestError::NullValue {
        path: path.to_path_buf(),
        row,
        column,
    }
}

/// Convert a timestamp column to naive UTC date-times.
fn extract_timestamps(
    path: &Path,
    col: &ArrayRef,
    offset: usize,
) -> Result<Vec<NaiveDateTime>, IngestError> {
    let parse_text = |i: usize, v: Option<&str>| {
        let text = v.ok_or_else(|| null_error(path, "timestamp", offset + i))?;
        parse_timestamp(text).ok_or_else(|| IngestError::Timestamp {
            path: path.to_path_buf(),
            row: offset + i,
            text: text.to_string(),
        })
    };

    let nanos_per_unit: i64 = match col.data_type() {
        DataType::Utf8 => {
            return col
                .as_string::<i32>()
                .iter()
                .enumerate()
                .map(|(i, v)| parse_text(i, v))
                .collect();
        }
        DataType::LargeUtf8 => {
            return col
                .as_string::<i64>()
                .iter()
                .enumerate()
                .map(|(i, v)| parse_text(i, v))
                .collect();
        }
        DataType::Int64 => 1,
        DataType::Timestamp(TimeUnit::Second, _) => 1_000_000_000,
        DataType::Timestamp(TimeUnit::Millisecond, _) => 1_000_000,
        DataType::Timestamp(TimeUnit::Microsecond, _) => 1_000,
        DataType::Timestamp(TimeUnit::Nanosecond, _) => 1,
        other => return Err(column_type_error(path, "timestamp", other)),
    };

    let ints = cast(col, &DataType::Int64).map_err(|source| IngestError::Arrow {
        path: path.to_path_buf(),
        source,
    })?;
    ints.as_primitive::<Int64Type>()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let v = v.ok_or_else(|| null_error(path, "timestamp", offset + i))?;
            v.checked_mul(nanos_per_unit)
                .and_then(from_epoch_nanos)
                .ok_or_else(|| IngestError::Timestamp {
                    path: path.to_path_buf(),
                    row: offset + i,
                    text: v.to_string(),
                })
        })
        .collect()
}

fn extract_strings(
    path: &Path,
    col: &ArrayRef,
    name: &'static str,
    offset: usize,
) -> Result<Vec<String>, IngestError> {
    let text = match col.data_type() {
        DataType::Utf8 => col.clone(),
        dt if dt.is_numeric() || *dt == DataType::LargeUtf8 => {
            cast(col, &DataType::Utf8).map_err(|source| IngestError::Arrow {
                path: path.to_path_buf(),
                source,
            })?
        }
        other => return Err(column_type_error(path, name, other)),
    };

    text.as_string::<i32>()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.map(str::to_string)
                .ok_or_else(|| null_error(path, name, offset + i))
        })
        .collect()
}

fn extract_f64s(path: &Path, col: &ArrayRef, name: &'static str) -> Result<Vec<f64>, IngestError> {
    if !col.data_type().is_numeric() {
        return Err(column_type_error(path, name, col.data_type()));
    }
    let floats = cast(col, &DataType::Float64).map_err(|source| IngestError::Arrow {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(floats
        .as_primitive::<Float64Type>()
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    // ── CSV ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_csv_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.csv",
            "timestamp,series_id,value,noise_level\n\
             2024-01-01 00:00:00,A,5.0,0.0\n\
             2024-01-01 00:00:01,B,6.5,0.1\n",
        );
        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].series_id, "A");
        assert_eq!(records[1].value, 6.5);
        assert_eq!(records[1].noise_level, 0.1);
    }

    #[test]
    fn test_load_csv_reordered_and_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.csv",
            "noise_level,extra,value,series_id,timestamp\n\
             0.0,ignored,1.5,S1,2024-02-02T12:00:00\n",
        );
        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 1.5);
        assert_eq!(records[0].series_id, "S1");
    }

    #[test]
    fn test_load_csv_empty_numeric_is_nan() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.csv",
            "timestamp,series_id,value,noise_level\n2024-01-01,A,,\n",
        );
        let records = load_file(&path).unwrap();
        assert!(records[0].value.is_nan());
        assert!(records[0].noise_level.is_nan());
    }

    #[test]
    fn test_load_csv_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.csv",
            "timestamp,series_id,value\n2024-01-01,A,1.0\n",
        );
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                column: "noise_level",
                ..
            }
        ));
    }

    #[test]
    fn test_load_csv_bad_timestamp_reports_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.csv",
            "timestamp,series_id,value,noise_level\n\
             2024-01-01,A,1.0,0.0\n\
             not-a-date,A,2.0,0.0\n",
        );
        match load_file(&path).unwrap_err() {
            IngestError::Timestamp { row, text, .. } => {
                assert_eq!(row, 1);
                assert_eq!(text, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_csv_non_numeric_value_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.csv",
            "timestamp,series_id,value,noise_level\n2024-01-01,A,abc,0.0\n",
        );
        assert!(matches!(load_file(&path), Err(IngestError::Csv { .. })));
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_file_is_missing_partition() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, IngestError::MissingPartition(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "part.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { ref ext, .. } if ext == "xlsx"));
    }

    // ── JSON ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "part.json",
            r#"[
                {"timestamp": "2024-01-01T00:00:00", "series_id": "A", "value": 1.0, "noise_level": 0.0},
                {"timestamp": 1000000000, "series_id": "B", "value": 2.0, "noise_level": null}
            ]"#,
        );
        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].timestamp, from_epoch_nanos(1_000_000_000).unwrap());
        assert!(records[1].noise_level.is_nan());
    }

    // ── Parquet ───────────────────────────────────────────────────────────────

    #[test]
    fn test_load_parquet_int_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("part.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("timestamp", DataType::Int64, false),
            Field::new("series_id", DataType::Utf8, false),
            Field::new("value", DataType::Float64, true),
            Field::new("noise_level", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![2_000_000_000, 1_000_000_000])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![Some(3.0), None])),
                Arc::new(Float64Array::from(vec![0.0, 0.2])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, from_epoch_nanos(2_000_000_000).unwrap());
        assert_eq!(records[0].value, 3.0);
        assert!(records[1].value.is_nan());
        assert_eq!(records[1].noise_level, 0.2);
    }

    fn write_parquet_text_timestamps(path: &Path, batches: &[Vec<&str>]) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("timestamp", DataType::Utf8, false),
            Field::new("series_id", DataType::Utf8, false),
            Field::new("value", DataType::Float64, true),
            Field::new("noise_level", DataType::Float64, true),
        ]));
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema.clone(), None).unwrap();
        for stamps in batches {
            let n = stamps.len();
            let batch = RecordBatch::try_new(
                schema.clone(),
                vec![
                    Arc::new(StringArray::from(stamps.clone())),
                    Arc::new(StringArray::from(vec!["A"; n])),
                    Arc::new(Float64Array::from(vec![1.0; n])),
                    Arc::new(Float64Array::from(vec![0.0; n])),
                ],
            )
            .unwrap();
            writer.write(&batch).unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn test_load_parquet_text_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("part.parquet");
        write_parquet_text_timestamps(
            &path,
            &[vec!["2024-01-01 00:00:05", "2024-01-01T00:00:00Z"]],
        );

        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].timestamp,
            parse_timestamp("2024-01-01 00:00:05").unwrap()
        );
        assert_eq!(
            records[1].timestamp,
            parse_timestamp("2024-01-01 00:00:00").unwrap()
        );
    }

    #[test]
    fn test_load_parquet_bad_text_timestamp_reports_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("part.parquet");
        write_parquet_text_timestamps(
            &path,
            &[
                vec!["2024-01-01 00:00:00", "2024-01-01 00:00:01"],
                vec!["2024-01-01 00:00:02", "not a time"],
            ],
        );

        match load_file(&path).unwrap_err() {
            IngestError::Timestamp { row, text, .. } => {
                assert_eq!(row, 3);
                assert_eq!(text, "not a time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── load_partitions ───────────────────────────────────────────────────────

    #[test]
    fn test_load_partitions_concatenates_in_order() {
        let dir = TempDir::new().unwrap();
        let header = "timestamp,series_id,value,noise_level\n";
        let a = write_file(
            dir.path(),
            "a.csv",
            &format!("{header}2024-01-02,A,1.0,0.0\n2024-01-01,A,2.0,0.0\n"),
        );
        let b = write_file(dir.path(), "b.csv", &format!("{header}2024-01-03,B,3.0,0.5\n"));

        let ds = load_partitions(&[a, b]).unwrap();
        assert_eq!(ds.len(), 3);
        let values: Vec<f64> = ds.records.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_load_partitions_fails_on_any_missing() {
        let dir = TempDir::new().unwrap();
        let a = write_file(
            dir.path(),
            "a.csv",
            "timestamp,series_id,value,noise_level\n2024-01-01,A,1.0,0.0\n",
        );
        let err = load_partitions(&[a, dir.path().join("b.csv")]).unwrap_err();
        assert!(matches!(err, IngestError::MissingPartition(_)));
    }
}
