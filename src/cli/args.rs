use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bootplot",
    version,
    about = "Boxplots for distribution samples and percentile tuples"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sample the five reference distributions and render the bootstrap
    /// comparison boxplot.
    Sample(SampleArgs),
    /// Render a boxplot from percentile tuples in a JSON file.
    Plot(PlotArgs),
}

#[derive(Parser)]
pub struct SampleArgs {
    /// Samples per series.
    #[arg(long, default_value_t = 500)]
    pub samples: usize,

    /// Number of distributions to keep (1..=5).
    #[arg(long, default_value_t = 5)]
    pub dists: usize,

    /// RNG seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output directory.
    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 1000.0)]
    pub width: f64,

    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Also export the plot as PDF.
    #[arg(long, default_value_t = false)]
    pub pdf: bool,

    /// Also write the generated series as JSON.
    #[arg(long, default_value_t = false)]
    pub dump_data: bool,
}

#[derive(Parser)]
pub struct PlotArgs {
    /// JSON file holding an array of 5- or 6-value percentile entries.
    pub input: PathBuf,

    /// Comma-separated x tick labels; defaults to 1-based box indices.
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Compute the geometry but skip drawing it.
    #[arg(long, default_value_t = false)]
    pub no_redraw: bool,

    /// Log the parsed percentile entries before plotting.
    #[arg(long, default_value_t = false)]
    pub print_data: bool,

    /// Re-extract percentile tuples from the rendered geometry and write
    /// them to this path as JSON.
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 640.0)]
    pub width: f64,

    #[arg(long, default_value_t = 480.0)]
    pub height: f64,

    /// Also export the plot as PDF.
    #[arg(long, default_value_t = false)]
    pub pdf: bool,
}
