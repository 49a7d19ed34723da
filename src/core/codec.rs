//! Conversion between percentile entries and boxplot geometry.
//!
//! Decode builds placeholder geometry and overwrites its y values with the
//! supplied percentiles; encode reads the geometry back into entries. Both
//! directions route outliers through [`Outliers::normalize`].

use anyhow::{Result, bail};
use tracing::debug;

use crate::core::artifact::{BoxplotArtifact, FlierPoints};
use crate::core::percentiles::{Outliers, PercentileEntry};

/// Build a boxplot artifact from percentile entries.
///
/// A placeholder artifact with one box per entry supplies the x geometry
/// (positions, widths); every y value is then overwritten: lower cap and
/// whisker from `q1_start`/`q2_start`, box rectangle from `q2_start`/
/// `q4_start`, median from `q3_start`, upper whisker and cap from
/// `q4_start`/`q4_end`. Flat outlier arrays are repaired against the box
/// index first.
///
/// The shared y-limits are recomputed after every box as `[min * 1.1,
/// max * 1.1]` over the running extent of box ends and outlier values. For
/// a negative minimum the factor widens the range; for a positive minimum
/// it pulls the lower limit above the data. Kept as is.
///
/// Boxes are patched in input order; an entry with mismatched paired
/// outlier arrays fails at that box, leaving earlier boxes patched.
pub fn render_from_percentiles(
    entries: &[PercentileEntry],
    labels: Option<&[String]>,
) -> Result<BoxplotArtifact> {
    let mut artifact = BoxplotArtifact::placeholder(entries.len());
    apply_percentiles(&mut artifact, entries)?;

    if let Some(labels) = labels {
        artifact.x_tick_labels = labels.to_vec();
    }
    Ok(artifact)
}

/// Patch an existing artifact's y geometry in place. Exposed separately so
/// callers can re-plot onto geometry they already hold.
pub fn apply_percentiles(
    artifact: &mut BoxplotArtifact,
    entries: &[PercentileEntry],
) -> Result<()> {
    if entries.len() != artifact.len() {
        bail!(
            "artifact has {} boxes but {} percentile entries were given",
            artifact.len(),
            entries.len()
        );
    }

    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (box_no, entry) in entries.iter().enumerate() {
        let fliers = entry.fliers.clone().normalize(box_no);
        let b = &mut artifact.boxes[box_no];

        b.caps[0].y = [entry.q1_start, entry.q1_start];
        b.whiskers[0].y = [entry.q1_start, entry.q2_start];
        b.caps[1].y = [entry.q4_end, entry.q4_end];
        b.whiskers[1].y = [entry.q4_start, entry.q4_end];

        let v = &mut b.box_path.vertices;
        v[0][1] = entry.q2_start;
        v[1][1] = entry.q2_start;
        v[2][1] = entry.q4_start;
        v[3][1] = entry.q4_start;
        v[4][1] = entry.q2_start;

        b.median.y = [entry.q3_start, entry.q3_start];

        match fliers {
            Outliers::Paired { x, y } if !y.is_empty() => {
                if x.len() != y.len() {
                    bail!(
                        "box {}: outlier x and y arrays differ in length ({} vs {})",
                        box_no + 1,
                        x.len(),
                        y.len()
                    );
                }
                min_y = min_y.min(entry.q1_start);
                max_y = max_y.max(entry.q4_end);
                for &fy in &y {
                    min_y = min_y.min(fy);
                    max_y = max_y.max(fy);
                }
                b.fliers = FlierPoints { x, y };
            }
            _ => {
                min_y = min_y.min(entry.q1_start);
                max_y = max_y.max(entry.q4_end);
                b.fliers = FlierPoints::default();
            }
        }

        // Rescaled after every box so the limits track the running extent.
        artifact.y_limits = Some([min_y * 1.1, max_y * 1.1]);
    }

    Ok(())
}

/// Read percentile entries back out of boxplot geometry.
///
/// Reads the lower cap, the box path's first and third vertices (box bottom
/// and top), the median and the upper cap, plus the flier coordinate pair.
/// This inverts the vertex convention written by [`apply_percentiles`] and
/// by [`BoxplotArtifact::from_series`]; geometry produced any other way is
/// not guaranteed to decode into meaningful percentiles.
pub fn extract_percentiles(artifact: &BoxplotArtifact) -> Vec<PercentileEntry> {
    artifact
        .boxes
        .iter()
        .enumerate()
        .map(|(box_no, b)| {
            debug!("extracting percentiles for box {}", box_no + 1);
            let raw = Outliers::Paired {
                x: b.fliers.x.clone(),
                y: b.fliers.y.clone(),
            };
            PercentileEntry::new(
                b.caps[0].y[0],
                b.box_path.vertices[0][1],
                b.median.y[0],
                b.box_path.vertices[2][1],
                b.caps[1].y[0],
            )
            .with_fliers(raw.normalize(box_no))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::percentiles::parse_entries;

    fn entry(q: [f64; 5]) -> PercentileEntry {
        PercentileEntry::new(q[0], q[1], q[2], q[3], q[4])
    }

    #[test]
    fn single_box_geometry_matches_inputs() {
        let art = render_from_percentiles(&[entry([1.0, 2.0, 3.0, 4.0, 5.0])], None).unwrap();
        let b = &art.boxes[0];
        assert_eq!(b.caps[0].y, [1.0, 1.0]);
        assert_eq!(b.caps[1].y, [5.0, 5.0]);
        assert_eq!(b.whiskers[0].y, [1.0, 2.0]);
        assert_eq!(b.whiskers[1].y, [4.0, 5.0]);
        assert_eq!(b.median.y, [3.0, 3.0]);
        let ys: Vec<f64> = b.box_path.vertices.iter().map(|v| v[1]).collect();
        assert_eq!(ys, vec![2.0, 2.0, 4.0, 4.0, 2.0]);
        let [lo, hi] = art.y_limits.unwrap();
        assert!((lo - 1.1).abs() < 1e-12);
        assert!((hi - 5.5).abs() < 1e-12);
        assert_eq!(art.x_tick_labels, vec!["1"]);
    }

    #[test]
    fn x_geometry_is_inherited_from_placeholder() {
        let placeholder = BoxplotArtifact::placeholder(2);
        let art = render_from_percentiles(
            &[entry([1.0, 2.0, 3.0, 4.0, 5.0]), entry([0.0, 1.0, 2.0, 3.0, 4.0])],
            None,
        )
        .unwrap();
        for (a, p) in art.boxes.iter().zip(&placeholder.boxes) {
            assert_eq!(a.box_path.vertices[0][0], p.box_path.vertices[0][0]);
            assert_eq!(a.box_path.vertices[1][0], p.box_path.vertices[1][0]);
            assert_eq!(a.caps[0].x, p.caps[0].x);
            assert_eq!(a.median.x, p.median.x);
        }
    }

    #[test]
    fn round_trip_preserves_percentiles() {
        let input = vec![
            entry([1.0, 2.0, 3.0, 4.0, 5.0]),
            entry([-2.0, 0.5, 1.0, 2.5, 6.0]),
        ];
        let art = render_from_percentiles(&input, None).unwrap();
        let out = extract_percentiles(&art);
        assert_eq!(out.len(), 2);
        for (got, want) in out.iter().zip(&input) {
            assert_eq!(got.q1_start, want.q1_start);
            assert_eq!(got.q2_start, want.q2_start);
            assert_eq!(got.q3_start, want.q3_start);
            assert_eq!(got.q4_start, want.q4_start);
            assert_eq!(got.q4_end, want.q4_end);
            assert!(got.fliers.is_empty());
        }
    }

    #[test]
    fn paired_outliers_survive_round_trip_unchanged() {
        let input = vec![entry([1.0, 2.0, 3.0, 4.0, 5.0]).with_fliers(Outliers::Paired {
            x: vec![1.0, 1.0],
            y: vec![7.5, 8.0],
        })];
        let art = render_from_percentiles(&input, None).unwrap();
        assert_eq!(art.boxes[0].fliers.y, vec![7.5, 8.0]);
        let out = extract_percentiles(&art);
        assert_eq!(out[0].fliers, input[0].fliers);
    }

    #[test]
    fn flat_outliers_are_repaired_with_box_index() {
        let input = vec![
            entry([1.0, 2.0, 3.0, 4.0, 5.0]),
            entry([1.0, 2.0, 3.0, 4.0, 5.0]).with_fliers(Outliers::Flat(vec![9.0, 9.5, 10.0])),
        ];
        let art = render_from_percentiles(&input, None).unwrap();
        let b = &art.boxes[1];
        assert_eq!(b.fliers.x, vec![2.0, 2.0, 2.0]);
        assert_eq!(b.fliers.y, vec![9.0, 9.5, 10.0]);
    }

    #[test]
    fn outliers_extend_y_limits() {
        let art = render_from_percentiles(
            &[entry([1.0, 2.0, 3.0, 4.0, 5.0]).with_fliers(Outliers::Flat(vec![20.0]))],
            None,
        )
        .unwrap();
        let [lo, hi] = art.y_limits.unwrap();
        assert!((lo - 1.1).abs() < 1e-12);
        assert!((hi - 22.0).abs() < 1e-12);
    }

    #[test]
    fn y_limit_span_never_shrinks() {
        // Extents widen, then narrow again; the running bound must only grow.
        let entries = vec![
            entry([1.0, 2.0, 3.0, 4.0, 5.0]),
            entry([-3.0, 0.0, 1.0, 2.0, 8.0]),
            entry([2.0, 2.5, 3.0, 3.5, 4.0]),
        ];
        let mut prev_span = 0.0;
        for k in 1..=entries.len() {
            let art = render_from_percentiles(&entries[..k], None).unwrap();
            let [lo, hi] = art.y_limits.unwrap();
            let span = hi - lo;
            assert!(span >= prev_span, "span shrank at box {}: {} < {}", k, span, prev_span);
            prev_span = span;
        }
    }

    #[test]
    fn custom_labels_are_used_verbatim() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let art = render_from_percentiles(
            &[entry([1.0, 2.0, 3.0, 4.0, 5.0]), entry([1.0, 2.0, 3.0, 4.0, 5.0])],
            Some(&labels),
        )
        .unwrap();
        assert_eq!(art.x_tick_labels, labels);
    }

    #[test]
    fn mismatched_paired_arrays_fail() {
        let input = vec![entry([1.0, 2.0, 3.0, 4.0, 5.0]).with_fliers(Outliers::Paired {
            x: vec![1.0],
            y: vec![7.0, 8.0],
        })];
        assert!(render_from_percentiles(&input, None).is_err());
    }

    #[test]
    fn shape_violation_produces_no_artifact() {
        assert!(parse_entries("[[1,2,3,4]]").is_err());
        assert!(parse_entries("[[1,2,3,4,5,6,7]]").is_err());
    }

    #[test]
    fn extract_on_sample_built_artifact() {
        // from_series writes the same vertex convention, so extraction
        // recovers its summary values.
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let art = BoxplotArtifact::from_series(&[data]);
        let out = extract_percentiles(&art);
        assert!((out[0].q2_start - 25.75).abs() < 1e-12);
        assert!((out[0].q3_start - 50.5).abs() < 1e-12);
        assert!((out[0].q4_start - 75.25).abs() < 1e-12);
    }
}
