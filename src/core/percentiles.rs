//! Percentile tuples: the compact 5/6-field summary of one box.
//!
//! An entry carries the lower whisker cap, box bottom, median, box top and
//! upper whisker cap values, plus optional outlier coordinates. Outlier
//! shape is classified once, up front, into an explicit variant instead of
//! being sniffed at use sites: a flat array of y-values is still accepted
//! (and later repaired against the box index), but anything that is neither
//! flat nor an `[xs, ys]` pair is a parse error.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use tracing::{debug, warn};

pub const SHAPE_ERROR: &str = "percentile arrays must have either 5 or 6 values";

/// Outlier coordinates attached to a percentile entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Outliers {
    /// No outliers provided (5-value entry).
    None,
    /// Only y-values were provided; x-coordinates are synthesized from the
    /// box index during normalization.
    Flat(Vec<f64>),
    /// Complete coordinate pair.
    Paired { x: Vec<f64>, y: Vec<f64> },
}

impl Outliers {
    pub fn is_empty(&self) -> bool {
        match self {
            Outliers::None => true,
            Outliers::Flat(y) => y.is_empty(),
            Outliers::Paired { y, .. } => y.is_empty(),
        }
    }

    /// Repair a flat y-only value against the 0-based box index: the missing
    /// x-coordinates become a constant array filled with `box_no + 1`, the
    /// box's 1-based plot position. Complete pairs and absent outliers pass
    /// through untouched.
    pub fn normalize(self, box_no: usize) -> Outliers {
        match self {
            Outliers::Flat(y) => {
                warn!("outliers arrays being fixed for variable {}", box_no + 1);
                let x = vec![(box_no + 1) as f64; y.len()];
                Outliers::Paired { x, y }
            }
            Outliers::Paired { x, y } if !y.is_empty() => {
                debug!("variable {} already with complete outliers arrays", box_no + 1);
                Outliers::Paired { x, y }
            }
            other => {
                debug!("variable {} has no outliers", box_no + 1);
                other
            }
        }
    }
}

/// One validated percentile entry. Callers are expected to supply ordered
/// values (`q1_start <= q2_start <= q3_start <= q4_start <= q4_end`); the
/// ordering is not enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct PercentileEntry {
    /// Lower whisker cap.
    pub q1_start: f64,
    /// Box bottom.
    pub q2_start: f64,
    /// Median.
    pub q3_start: f64,
    /// Box top.
    pub q4_start: f64,
    /// Upper whisker cap.
    pub q4_end: f64,
    pub fliers: Outliers,
}

impl PercentileEntry {
    pub fn new(q1_start: f64, q2_start: f64, q3_start: f64, q4_start: f64, q4_end: f64) -> Self {
        Self {
            q1_start,
            q2_start,
            q3_start,
            q4_start,
            q4_end,
            fliers: Outliers::None,
        }
    }

    pub fn with_fliers(mut self, fliers: Outliers) -> Self {
        self.fliers = fliers;
        self
    }

    /// Parse one entry from a JSON array of 5 numbers, optionally followed
    /// by a 6th element holding the outliers: either a flat array of
    /// y-values or a two-element `[xs, ys]` pair. Any other length fails
    /// with the shape error.
    pub fn from_json(value: &Value) -> Result<Self> {
        let arr = match value.as_array() {
            Some(a) => a,
            None => bail!("percentile entry must be a JSON array"),
        };
        if arr.len() != 5 && arr.len() != 6 {
            bail!("{} (got {})", SHAPE_ERROR, arr.len());
        }

        let mut q = [0.0; 5];
        for (i, v) in arr[..5].iter().enumerate() {
            q[i] = v
                .as_f64()
                .with_context(|| format!("percentile value {} is not a number", i + 1))?;
        }

        let fliers = match arr.get(5) {
            None => Outliers::None,
            Some(v) => parse_fliers(v)?,
        };

        Ok(Self {
            q1_start: q[0],
            q2_start: q[1],
            q3_start: q[2],
            q4_start: q[3],
            q4_end: q[4],
            fliers,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut arr = vec![
            json!(self.q1_start),
            json!(self.q2_start),
            json!(self.q3_start),
            json!(self.q4_start),
            json!(self.q4_end),
        ];
        match &self.fliers {
            Outliers::None => {}
            Outliers::Flat(y) => arr.push(json!(y)),
            Outliers::Paired { x, y } => arr.push(json!([x, y])),
        }
        Value::Array(arr)
    }
}

fn parse_fliers(value: &Value) -> Result<Outliers> {
    let arr = match value.as_array() {
        Some(a) => a,
        None => bail!("outlier element must be a JSON array"),
    };
    if arr.is_empty() {
        return Ok(Outliers::None);
    }
    match &arr[0] {
        Value::Number(_) => Ok(Outliers::Flat(numbers(arr).context("flat outlier array")?)),
        Value::Array(_) => {
            if arr.len() != 2 {
                bail!("paired outliers must be exactly [xs, ys], got {} arrays", arr.len());
            }
            let x = numbers(arr[0].as_array().context("outlier xs must be an array")?)
                .context("outlier xs")?;
            let y = numbers(arr[1].as_array().context("outlier ys must be an array")?)
                .context("outlier ys")?;
            Ok(Outliers::Paired { x, y })
        }
        other => bail!("outlier element must hold numbers or [xs, ys], got {}", other),
    }
}

fn numbers(values: &[Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| v.as_f64().with_context(|| format!("expected a number, got {}", v)))
        .collect()
}

/// Parse a JSON document holding an array of percentile entries.
pub fn parse_entries(text: &str) -> Result<Vec<PercentileEntry>> {
    let value: Value = serde_json::from_str(text).context("invalid JSON")?;
    let arr = match value.as_array() {
        Some(a) => a,
        None => bail!("expected a JSON array of percentile entries"),
    };
    arr.iter()
        .enumerate()
        .map(|(i, v)| {
            PercentileEntry::from_json(v).with_context(|| format!("percentile entry {}", i + 1))
        })
        .collect()
}

/// Serialize entries back to pretty JSON, the inverse of [`parse_entries`].
pub fn entries_to_json(entries: &[PercentileEntry]) -> String {
    let arr: Vec<Value> = entries.iter().map(PercentileEntry::to_json).collect();
    serde_json::to_string_pretty(&Value::Array(arr)).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_five_value_entry() {
        let e = PercentileEntry::from_json(&json!([1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        assert_eq!(e, PercentileEntry::new(1.0, 2.0, 3.0, 4.0, 5.0));
        assert_eq!(e.fliers, Outliers::None);
    }

    #[test]
    fn parses_flat_outliers() {
        let e = PercentileEntry::from_json(&json!([1.0, 2.0, 3.0, 4.0, 5.0, [8.5, 9.0]])).unwrap();
        assert_eq!(e.fliers, Outliers::Flat(vec![8.5, 9.0]));
    }

    #[test]
    fn parses_paired_outliers() {
        let e = PercentileEntry::from_json(&json!([1, 2, 3, 4, 5, [[1.0, 1.0], [8.5, 9.0]]]))
            .unwrap();
        assert_eq!(
            e.fliers,
            Outliers::Paired {
                x: vec![1.0, 1.0],
                y: vec![8.5, 9.0]
            }
        );
    }

    #[test]
    fn rejects_wrong_length() {
        for bad in [json!([1, 2, 3, 4]), json!([1, 2, 3, 4, 5, [], 7])] {
            let err = PercentileEntry::from_json(&bad).unwrap_err();
            assert!(err.to_string().contains(SHAPE_ERROR), "{}", err);
        }
    }

    #[test]
    fn rejects_malformed_outlier_element() {
        assert!(PercentileEntry::from_json(&json!([1, 2, 3, 4, 5, "x"])).is_err());
        assert!(PercentileEntry::from_json(&json!([1, 2, 3, 4, 5, [[1.0], [2.0], [3.0]]])).is_err());
    }

    #[test]
    fn empty_outlier_array_means_none() {
        let e = PercentileEntry::from_json(&json!([1, 2, 3, 4, 5, []])).unwrap();
        assert_eq!(e.fliers, Outliers::None);
    }

    #[test]
    fn normalize_repairs_flat_with_box_position() {
        let fixed = Outliers::Flat(vec![9.0, 9.5, 10.0]).normalize(2);
        assert_eq!(
            fixed,
            Outliers::Paired {
                x: vec![3.0, 3.0, 3.0],
                y: vec![9.0, 9.5, 10.0]
            }
        );
    }

    #[test]
    fn normalize_keeps_complete_pairs() {
        let pair = Outliers::Paired {
            x: vec![4.0],
            y: vec![12.0],
        };
        assert_eq!(pair.clone().normalize(0), pair);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = Outliers::Flat(vec![1.0, 2.0]).normalize(4);
        assert_eq!(once.clone().normalize(4), once);
    }

    #[test]
    fn json_round_trip() {
        let entries = vec![
            PercentileEntry::new(1.0, 2.0, 3.0, 4.0, 5.0),
            PercentileEntry::new(0.0, 1.0, 2.0, 3.0, 4.0).with_fliers(Outliers::Paired {
                x: vec![2.0],
                y: vec![8.0],
            }),
        ];
        let text = entries_to_json(&entries);
        assert_eq!(parse_entries(&text).unwrap(), entries);
    }

    #[test]
    fn parse_entries_reports_entry_index() {
        let err = parse_entries("[[1,2,3,4,5],[1,2,3]]").unwrap_err();
        assert!(format!("{:#}", err).contains("percentile entry 2"));
    }
}
