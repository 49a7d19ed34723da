//! Boxplot geometry primitives.
//!
//! A [`BoxplotArtifact`] owns the rendered primitives of one figure: per box
//! two caps, two whiskers, a closed rectangular box path, a median segment
//! and flier coordinates, plus the shared y-limits and x tick labels. The
//! codec mutates this geometry in place; the SVG canvas only reads it.

use crate::core::summary::BoxSummary;

/// Fraction of the unit slot occupied by the box.
pub const BOX_WIDTH: f64 = 0.5;
/// Caps are half as wide as the box.
pub const CAP_WIDTH: f64 = 0.25;

/// Dummy series used to seed placeholder geometry before the codec patches
/// it with real percentile values.
pub const PLACEHOLDER_SAMPLE: [f64; 5] = [-9.0, -4.0, 2.0, 4.0, 9.0];

/// A two-point line segment (caps, whiskers, medians).
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Closed rectangular box outline: bottom-left, bottom-right, top-right,
/// top-left, back to bottom-left. The codec relies on this vertex order when
/// it writes and reads q2/q4.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxPath {
    pub vertices: [[f64; 2]; 5],
}

/// Outlier marker coordinates for one box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlierPoints {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl FlierPoints {
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// All primitives of a single box. Caps and whiskers are ordered lower
/// first, upper second.
#[derive(Clone, Debug)]
pub struct BoxArtifact {
    pub caps: [Segment; 2],
    pub whiskers: [Segment; 2],
    pub box_path: BoxPath,
    pub median: Segment,
    pub fliers: FlierPoints,
}

#[derive(Clone, Debug)]
pub struct BoxplotArtifact {
    pub boxes: Vec<BoxArtifact>,
    /// `[low, high]` of the shared y-axis, if set.
    pub y_limits: Option<[f64; 2]>,
    pub x_tick_labels: Vec<String>,
}

impl BoxArtifact {
    /// Build one box at 1-based position `pos` from a series summary.
    fn from_summary(pos: f64, s: &BoxSummary) -> Self {
        let half_box = BOX_WIDTH / 2.0;
        let half_cap = CAP_WIDTH / 2.0;
        Self {
            caps: [
                Segment {
                    x: [pos - half_cap, pos + half_cap],
                    y: [s.whisker_lo, s.whisker_lo],
                },
                Segment {
                    x: [pos - half_cap, pos + half_cap],
                    y: [s.whisker_hi, s.whisker_hi],
                },
            ],
            whiskers: [
                Segment {
                    x: [pos, pos],
                    y: [s.whisker_lo, s.q1],
                },
                Segment {
                    x: [pos, pos],
                    y: [s.q3, s.whisker_hi],
                },
            ],
            box_path: BoxPath {
                vertices: [
                    [pos - half_box, s.q1],
                    [pos + half_box, s.q1],
                    [pos + half_box, s.q3],
                    [pos - half_box, s.q3],
                    [pos - half_box, s.q1],
                ],
            },
            median: Segment {
                x: [pos - half_box, pos + half_box],
                y: [s.median, s.median],
            },
            fliers: FlierPoints {
                x: vec![pos; s.fliers.len()],
                y: s.fliers.clone(),
            },
        }
    }

    /// Center x position of the box, taken from its path.
    pub fn position(&self) -> f64 {
        (self.box_path.vertices[0][0] + self.box_path.vertices[1][0]) / 2.0
    }
}

impl BoxplotArtifact {
    /// Build a real boxplot: one box per series, positioned 1..=n.
    pub fn from_series(series: &[Vec<f64>]) -> Self {
        let boxes = series
            .iter()
            .enumerate()
            .map(|(i, s)| BoxArtifact::from_summary((i + 1) as f64, &BoxSummary::from_series(s)))
            .collect();
        Self {
            boxes,
            y_limits: None,
            x_tick_labels: (1..=series.len()).map(|i| i.to_string()).collect(),
        }
    }

    /// Placeholder geometry for `n_box` boxes, seeded from
    /// [`PLACEHOLDER_SAMPLE`]. Only the x geometry of the result matters;
    /// the codec overwrites every y value.
    pub fn placeholder(n_box: usize) -> Self {
        Self::from_series(&vec![PLACEHOLDER_SAMPLE.to_vec(); n_box])
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Y extent of all geometry (caps, boxes and fliers), ignoring the
    /// stored y-limits.
    pub fn y_extent(&self) -> Option<[f64; 2]> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for b in &self.boxes {
            for seg in b.caps.iter().chain(&b.whiskers).chain([&b.median]) {
                for &y in &seg.y {
                    lo = lo.min(y);
                    hi = hi.max(y);
                }
            }
            for v in &b.box_path.vertices {
                lo = lo.min(v[1]);
                hi = hi.max(v[1]);
            }
            for &y in &b.fliers.y {
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }
        if lo.is_finite() && hi.is_finite() {
            Some([lo, hi])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_box_geometry() {
        let art = BoxplotArtifact::placeholder(3);
        assert_eq!(art.len(), 3);
        assert_eq!(art.x_tick_labels, vec!["1", "2", "3"]);

        let b = &art.boxes[1];
        assert_eq!(b.position(), 2.0);
        // The dummy sample has q1 = -4, median = 2, q3 = 4 and whiskers at
        // the extremes.
        assert_eq!(b.box_path.vertices[0], [1.75, -4.0]);
        assert_eq!(b.box_path.vertices[2], [2.25, 4.0]);
        assert_eq!(b.box_path.vertices[4], b.box_path.vertices[0]);
        assert_eq!(b.median.y, [2.0, 2.0]);
        assert_eq!(b.caps[0].y, [-9.0, -9.0]);
        assert_eq!(b.caps[1].y, [9.0, 9.0]);
        assert!(b.fliers.is_empty());
    }

    #[test]
    fn from_series_marks_fliers_at_box_position() {
        let mut data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        data.push(200.0);
        let art = BoxplotArtifact::from_series(&[data]);
        let b = &art.boxes[0];
        assert_eq!(b.fliers.y, vec![200.0]);
        assert_eq!(b.fliers.x, vec![1.0]);
    }

    #[test]
    fn y_extent_covers_fliers() {
        let mut data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        data.push(200.0);
        let art = BoxplotArtifact::from_series(&[data]);
        let [lo, hi] = art.y_extent().unwrap();
        assert_eq!(lo, 1.0);
        assert_eq!(hi, 200.0);
    }
}
