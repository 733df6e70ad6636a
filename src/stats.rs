use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ValueSummary – describe()-style statistics
// ---------------------------------------------------------------------------

/// Count, moments and quartiles of a value column. NaN inputs are ignored;
/// entries that are undefined for the sample size are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ValueSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        if count == 0 {
            return ValueSummary {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        ValueSummary {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Linear interpolation between the two closest ranks. `sorted` must be
/// non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl fmt::Display for ValueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<(&str, String)> = self
            .rows()
            .iter()
            .map(|(label, v)| (*label, format!("{v:.6}")))
            .collect();
        let width = cells.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
        for (label, cell) in &cells {
            writeln!(f, "{label:<5}  {cell:>width$}")?;
        }
        write!(f, "Name: value, dtype: float64")
    }
}

// ---------------------------------------------------------------------------
// Value levels – how often each 0.1-rounded value occurs
// ---------------------------------------------------------------------------

/// Round to one decimal with ties going to the even neighbour.
pub fn round_level(v: f64) -> f64 {
    let r = (v * 10.0).round_ties_even() / 10.0;
    // Fold -0.0 into 0.0 so both count as one level.
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// The `top` most frequent rounded levels as `(level, count)`, ordered by
/// count descending, ties by first appearance. NaN values are skipped.
pub fn value_levels(values: &[f64], top: usize) -> Vec<(f64, usize)> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for v in values.iter().copied().filter(|v| !v.is_nan()) {
        let level = round_level(v);
        match index.get(&level.to_bits()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(level.to_bits(), counts.len());
                counts.push((level, 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top);
    counts
}
