//! SVG rendering of boxplots.
//!
//! The canvas is an explicit scoped resource: [`SvgCanvas::new`] opens the
//! document, drawing calls append to its buffer, and [`SvgCanvas::finish`]
//! or [`SvgCanvas::write_to`] closes and flushes it. Nothing draws to an
//! implicit shared surface.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::artifact::BoxplotArtifact;
use crate::core::codec;
use crate::core::percentiles::PercentileEntry;
use crate::core::sampler::Dataset;
use crate::core::summary::BoxSummary;

const LEFT: f64 = 50.0;
const RIGHT: f64 = 20.0;
const TOP: f64 = 28.0;
const BOTTOM: f64 = 70.0;

/// Alternating box fills: dark khaki for originals, royal blue for
/// bootstrap resamples.
pub const BOX_COLORS: [&str; 2] = ["#bdb76b", "#4169e1"];

#[derive(Clone, Copy, Debug)]
pub struct PlotOptions {
    /// Draw the patched artifact onto the canvas. When false the geometry
    /// is still computed and returned, but nothing is rendered.
    pub redraw: bool,
    /// Dump the parsed percentile entries at debug level before plotting.
    pub print_data: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            redraw: true,
            print_data: false,
        }
    }
}

pub struct SvgCanvas {
    w: f64,
    h: f64,
    out: String,
}

impl SvgCanvas {
    pub fn new(w: f64, h: f64) -> Result<Self> {
        let mut out = String::new();
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            w, h, w, h
        )?;
        writeln!(
            out,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#fff\"/>",
            w, h
        )?;
        Ok(Self { w, h, out })
    }

    fn plot_area(&self) -> (f64, f64, f64, f64) {
        (LEFT, TOP, self.w - LEFT - RIGHT, self.h - TOP - BOTTOM)
    }

    /// Close the document and hand back the SVG text.
    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }

    /// Close the document and flush it to `path`.
    pub fn write_to(self, path: &Path) -> Result<()> {
        let svg = self.finish();
        fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Decode percentile entries into boxplot geometry and, unless redraw is
/// disabled, draw the result onto the canvas. Returns the artifact for
/// further inspection.
pub fn plot_percentiles(
    canvas: &mut SvgCanvas,
    entries: &[PercentileEntry],
    labels: Option<&[String]>,
    opts: &PlotOptions,
) -> Result<BoxplotArtifact> {
    if opts.print_data {
        debug!("plotting percentile entries: {:?}", entries);
    }
    let artifact = codec::render_from_percentiles(entries, labels)?;
    if opts.redraw {
        draw_artifact(canvas, &artifact)?;
    }
    Ok(artifact)
}

/// Draw a boxplot artifact, honoring its y-limits and tick labels.
pub fn draw_artifact(canvas: &mut SvgCanvas, artifact: &BoxplotArtifact) -> Result<()> {
    let (left, top, plot_w, plot_h) = canvas.plot_area();
    let out = &mut canvas.out;

    let n = artifact.len();
    let (x_min, x_max) = (0.5, n as f64 + 0.5);
    let [y_min, y_max] = match artifact.y_limits.or_else(|| artifact.y_extent()) {
        Some(lim) => lim,
        None => [0.0, 1.0],
    };

    draw_frame(out, left, top, plot_w, plot_h)?;
    draw_y_axis_ticks(out, left, top, plot_w, plot_h, y_min, y_max, 5)?;
    draw_axis_labels(out, left, top, plot_w, plot_h, "Box", "Value")?;

    let sx = |x: f64| left + (x - x_min) / (x_max - x_min).max(1e-6) * plot_w;
    let sy = |y: f64| top + plot_h - (y - y_min) / (y_max - y_min).max(1e-6) * plot_h;

    for b in &artifact.boxes {
        for seg in b.whiskers.iter().chain(&b.caps) {
            draw_line(out, sx(seg.x[0]), sy(seg.y[0]), sx(seg.x[1]), sy(seg.y[1]), "#000", 1.0)?;
        }

        let v = &b.box_path.vertices;
        let bx = sx(v[0][0]);
        let bw = sx(v[1][0]) - sx(v[0][0]);
        let y_lo = sy(v[0][1]);
        let y_hi = sy(v[2][1]);
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#000\"/>",
            bx,
            y_hi.min(y_lo),
            bw,
            (y_lo - y_hi).abs()
        )?;

        draw_line(
            out,
            sx(b.median.x[0]),
            sy(b.median.y[0]),
            sx(b.median.x[1]),
            sy(b.median.y[1]),
            "#000",
            1.2,
        )?;

        for (&fx, &fy) in b.fliers.x.iter().zip(&b.fliers.y) {
            draw_plus(out, sx(fx), sy(fy), 3.0, "#d22")?;
        }
    }

    draw_box_labels(out, left, top, plot_w, plot_h, &artifact.x_tick_labels, x_min, x_max, false)?;
    Ok(())
}

/// Draw the styled sample boxplot: two boxes per distribution with
/// alternating fill, median lines, mean markers, flier markers, median
/// annotations and the fixed legend.
pub fn draw_sample_boxplot(canvas: &mut SvgCanvas, dataset: &Dataset) -> Result<()> {
    let (left, top, plot_w, plot_h) = canvas.plot_area();
    let (w, h) = (canvas.w, canvas.h);
    let out = &mut canvas.out;

    let n_boxes = dataset.data.len();
    let (x_min, x_max) = (0.5, n_boxes as f64 + 0.5);
    let data_max = dataset
        .data
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    // Fixed lower bound, 10% headroom above the data.
    let y_min = -5.0;
    let y_max = data_max * 1.1;

    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"#222\" text-anchor=\"middle\">Comparison of IID Bootstrap Resampling Across {} Distributions</text>",
        left + plot_w / 2.0,
        top - 10.0,
        dataset.num_dists
    )?;

    draw_frame(out, left, top, plot_w, plot_h)?;
    draw_y_axis_ticks(out, left, top, plot_w, plot_h, y_min, y_max, 6)?;
    draw_axis_labels(out, left, top, plot_w, plot_h, "Distribution", "Value")?;

    let sx = |x: f64| left + (x - x_min) / (x_max - x_min).max(1e-6) * plot_w;
    let sy = |y: f64| top + plot_h - (y - y_min) / (y_max - y_min).max(1e-6) * plot_h;

    let mut medians = Vec::with_capacity(n_boxes);
    for (i, series) in dataset.data.iter().enumerate() {
        let s = BoxSummary::from_series(series);
        let pos = (i + 1) as f64;
        let color = BOX_COLORS[i % 2];

        let bx = sx(pos - 0.25);
        let bw = sx(pos + 0.25) - sx(pos - 0.25);
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"#000\"/>",
            bx,
            sy(s.q3),
            bw,
            (sy(s.q1) - sy(s.q3)).max(0.0),
            color
        )?;

        // Whiskers and caps.
        draw_line(out, sx(pos), sy(s.whisker_lo), sx(pos), sy(s.q1), "#000", 1.0)?;
        draw_line(out, sx(pos), sy(s.q3), sx(pos), sy(s.whisker_hi), "#000", 1.0)?;
        let cap = (bw * 0.5).max(1.0);
        draw_line(out, sx(pos) - cap / 2.0, sy(s.whisker_lo), sx(pos) + cap / 2.0, sy(s.whisker_lo), "#000", 1.0)?;
        draw_line(out, sx(pos) - cap / 2.0, sy(s.whisker_hi), sx(pos) + cap / 2.0, sy(s.whisker_hi), "#000", 1.0)?;

        // Median line redrawn over the fill.
        draw_line(out, bx, sy(s.median), bx + bw, sy(s.median), "#000", 1.2)?;

        // Sample mean as a white star.
        draw_star(out, sx(pos), sy(s.mean), 4.0)?;

        for &f in &s.fliers {
            draw_plus(out, sx(pos), sy(f), 3.0, "#d22")?;
        }
        medians.push(s.median);
    }

    // Median value annotations near the top edge, bold / semibold by parity.
    for (i, m) in medians.iter().enumerate() {
        let k = i % 2;
        let weight = if k == 0 { "bold" } else { "600" };
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"9\" font-weight=\"{}\" fill=\"{}\" text-anchor=\"middle\">{:.2}</text>",
            sx((i + 1) as f64),
            top + 10.0,
            weight,
            BOX_COLORS[k],
            m
        )?;
    }

    draw_box_labels(out, left, top, plot_w, plot_h, &dataset.labels, x_min, x_max, true)?;
    draw_legend(out, w, h, dataset.n)?;
    Ok(())
}

fn draw_legend(out: &mut String, w: f64, h: f64, n: usize) -> Result<()> {
    let x = w - 150.0;
    let rows: [(&str, String, &str); 3] = [
        (BOX_COLORS[0], format!("{} Random Numbers", n), "#000"),
        (BOX_COLORS[1], "IID Bootstrap Resample".to_string(), "#fff"),
        ("#c0c0c0", "* Average Value".to_string(), "#000"),
    ];
    for (i, (bg, text, fg)) in rows.iter().enumerate() {
        let y = h - 40.0 + i as f64 * 13.0;
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"140\" height=\"12\" fill=\"{}\"/>",
            x,
            y - 9.0,
            bg
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"9\" fill=\"{}\">{}</text>",
            x + 3.0,
            y,
            fg,
            text
        )?;
    }
    Ok(())
}

fn draw_frame(out: &mut String, left: f64, top: f64, plot_w: f64, plot_h: f64) -> Result<()> {
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\" stroke=\"#ddd\"/>",
        left, top, plot_w, plot_h
    )?;
    Ok(())
}

fn draw_line(
    out: &mut String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    stroke: &str,
    width: f64,
) -> Result<()> {
    writeln!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        x1, y1, x2, y2, stroke, width
    )?;
    Ok(())
}

fn draw_plus(out: &mut String, x: f64, y: f64, r: f64, color: &str) -> Result<()> {
    draw_line(out, x - r, y, x + r, y, color, 1.0)?;
    draw_line(out, x, y - r, x, y + r, color, 1.0)
}

fn draw_star(out: &mut String, x: f64, y: f64, r: f64) -> Result<()> {
    let mut points = String::new();
    for i in 0..10 {
        let angle = std::f64::consts::PI * (i as f64 / 5.0) - std::f64::consts::FRAC_PI_2;
        let radius = if i % 2 == 0 { r } else { r * 0.45 };
        let _ = write!(points, "{:.2},{:.2} ", x + radius * angle.cos(), y + radius * angle.sin());
    }
    writeln!(
        out,
        "<polygon points=\"{}\" fill=\"#fff\" stroke=\"#000\" stroke-width=\"0.8\"/>",
        points.trim_end()
    )?;
    Ok(())
}

/// One label per box, centered under its position and rotated 45 degrees
/// when requested (distribution names are long; plain indices are not).
#[allow(clippy::too_many_arguments)]
fn draw_box_labels(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    labels: &[String],
    x_min: f64,
    x_max: f64,
    rotate: bool,
) -> Result<()> {
    for (i, label) in labels.iter().enumerate() {
        let x = left + ((i + 1) as f64 - x_min) / (x_max - x_min).max(1e-6) * plot_w;
        let y = top + plot_h + 12.0;
        if rotate {
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" font-size=\"9\" fill=\"#444\" text-anchor=\"start\" transform=\"rotate(45 {} {})\">{}</text>",
                x, y, x, y, label
            )?;
        } else {
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
                x, y, label
            )?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_y_axis_ticks(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    min_y: f64,
    max_y: f64,
    ticks: usize,
) -> Result<()> {
    if ticks < 2 || (max_y - min_y).abs() < 1e-9 {
        return Ok(());
    }
    let (start, step, count) = nice_ticks(min_y, max_y, ticks);
    for i in 0..count {
        let v = start + step * i as f64;
        if v < min_y - 1e-9 || v > max_y + 1e-9 {
            continue;
        }
        let y = top + plot_h - ((v - min_y) / (max_y - min_y).max(1e-6)) * plot_h;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#eee\"/>",
            left,
            y,
            left + plot_w,
            y
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            left - 4.0,
            y,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

fn draw_axis_labels(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    let x = left + plot_w / 2.0;
    let y = top + plot_h + 44.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
        x, y, x_label
    )?;
    let yx = left - 32.0;
    let yy = top + plot_h / 2.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\" transform=\"rotate(-90 {} {})\">{}</text>",
        yx, yy, yx, yy, y_label
    )?;
    Ok(())
}

fn fmt_tick(v: f64) -> String {
    if (v - v.round()).abs() < 0.001 {
        format!("{}", v.round() as i64)
    } else if v.abs() < 10.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.1}", v)
    }
}

fn nice_ticks(min: f64, max: f64, ticks: usize) -> (f64, f64, usize) {
    let range = (max - min).abs().max(1e-9);
    let rough = range / (ticks as f64 - 1.0);
    let mag = 10f64.powf(rough.abs().log10().floor());
    let norm = rough / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;
    let count = ((end - start) / step).round() as usize + 1;
    (start, step, count)
}
