//! Plain-text percentile report: per series the five percentiles, the IQR
//! and the 1.5 * IQR outlier fences.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::sampler::Dataset;
use crate::core::summary::quantile;

pub fn write(path: &Path, dataset: &Dataset) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );

    for (label, series) in dataset.labels.iter().zip(&dataset.data) {
        write_series(&mut w, label, series)?;
        writeln!(w)?;
    }
    Ok(())
}

fn write_series(w: &mut impl Write, label: &str, series: &[f64]) -> Result<()> {
    let pctl: Vec<f64> = [0.0, 0.25, 0.5, 0.75, 1.0]
        .iter()
        .map(|&p| quantile(series, p))
        .collect();
    let iqr = pctl[3] - pctl[1];
    let out = 1.5 * iqr;

    writeln!(w, "percentiles for variable {}", label)?;
    writeln!(
        w,
        "[0, 25, 50, 75, 100] = [{:.6}, {:.6}, {:.6}, {:.6}, {:.6}]",
        pctl[0], pctl[1], pctl[2], pctl[3], pctl[4]
    )?;
    writeln!(w, "max = {:.6}", pctl[4])?;
    writeln!(w, "IQR = {:.6}", iqr)?;
    writeln!(w, "1.5 * IQR = {:.6}", out)?;
    writeln!(
        w,
        "find outliers on the left of {:.6} and on the right of {:.6}",
        pctl[1] - out,
        pctl[3] + out
    )?;
    Ok(())
}
