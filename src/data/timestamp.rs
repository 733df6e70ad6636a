use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Naive date-time layouts, tried in order. `%.f` also matches "no fraction".
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Layouts carrying a UTC offset; the instant is converted to UTC.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp cell the way a generic date parser would.
///
/// Accepted, in order of precedence:
/// * bare integers → nanoseconds since the Unix epoch
/// * RFC 3339 / ISO 8601 with offset or `Z` → converted to UTC
/// * naive ISO date-times (`T` or space, optional fraction, optional seconds)
/// * slash layouts `Y/m/d` and `m/d/Y`
/// * date-only values → midnight
///
/// Returns `None` for anything else (including empty cells).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(nanos) = s.parse::<i64>() {
        return from_epoch_nanos(nanos);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let normalised = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(head) => format!("{head}+00:00"),
        None => s.to_string(),
    };
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalised, fmt) {
            return Some(dt.naive_utc());
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Nanoseconds since 1970-01-01T00:00:00 as a naive UTC date-time.
pub fn from_epoch_nanos(nanos: i64) -> Option<NaiveDateTime> {
    let secs = nanos.div_euclid(1_000_000_000);
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, sub).map(|dt| dt.naive_utc())
}

// ---------------------------------------------------------------------------
// Plot-axis conversions
// ---------------------------------------------------------------------------

/// Seconds since the epoch (with fraction), used as the chart x coordinate.
pub fn to_plot_seconds(ts: NaiveDateTime) -> f64 {
    let utc = ts.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
}

/// Inverse of [`to_plot_seconds`], rounded to the nearest nanosecond.
pub fn from_plot_seconds(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    let secs = x.floor();
    let nanos = (((x - secs) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos).map(|dt| dt.naive_utc())
}
