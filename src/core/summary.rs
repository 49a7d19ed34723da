//! Five-number summaries for raw sample series.
//!
//! Quantiles use the R-7 definition (linear interpolation between order
//! statistics), matching what most plotting stacks compute by default.

/// Boxplot statistics for one series: quartiles, whisker extents clamped to
/// the most extreme samples within 1.5 * IQR of the box, fliers beyond the
/// fences, and the sample mean.
#[derive(Clone, Debug)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
    pub mean: f64,
    pub fliers: Vec<f64>,
}

/// Compute a single R-7 quantile from a pre-sorted slice.
///
/// # Panics
///
/// Panics if `sorted` is empty or `p` is outside [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "quantile probability must be in [0, 1]"
    );

    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        sorted[n - 1]
    } else if h_frac == 0.0 {
        sorted[h_floor]
    } else {
        sorted[h_floor] + h_frac * (sorted[h_floor + 1] - sorted[h_floor])
    }
}

/// Compute a quantile from unsorted data. Sorts a copy.
pub fn quantile(data: &[f64], p: f64) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    quantile_sorted(&sorted, p)
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

impl BoxSummary {
    /// Summarize one series.
    ///
    /// # Panics
    ///
    /// Panics if `series` is empty.
    pub fn from_series(series: &[f64]) -> Self {
        assert!(!series.is_empty(), "cannot summarize an empty series");

        let mut sorted = series.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        // Whiskers reach the most extreme samples still inside the fences;
        // everything outside becomes a flier.
        let mut whisker_lo = q1;
        let mut whisker_hi = q3;
        let mut fliers = Vec::new();
        for &v in &sorted {
            if v < lo_fence || v > hi_fence {
                fliers.push(v);
            } else {
                if v < whisker_lo {
                    whisker_lo = v;
                }
                if v > whisker_hi {
                    whisker_hi = v;
                }
            }
        }

        Self {
            q1,
            median,
            q3,
            whisker_lo,
            whisker_hi,
            mean: mean(series),
            fliers,
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
