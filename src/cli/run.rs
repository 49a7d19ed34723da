use crate::cli::args::{Cli, Commands, PlotArgs, SampleArgs};
use crate::core::codec;
use crate::core::percentiles;
use crate::core::sampler;
use crate::report;
use crate::report::svg::{PlotOptions, SvgCanvas};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use tracing::info;
use tracing_subscriber::prelude::*;

pub fn entry() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bootplot=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sample(args) => sample(args),
        Commands::Plot(args) => plot(args),
    }
}

fn sample(args: SampleArgs) -> Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output dir {}", args.out.display()))?;

    let dataset = sampler::generate(args.samples, args.dists, args.seed)?;
    info!(
        "sampled {} values from {} distributions",
        dataset.n, dataset.num_dists
    );

    let mut canvas = SvgCanvas::new(args.width, args.height)?;
    report::svg::draw_sample_boxplot(&mut canvas, &dataset)?;
    let svg = canvas.finish();

    let svg_path = args.out.join("boxplot.svg");
    fs::write(&svg_path, &svg).with_context(|| format!("failed to write {}", svg_path.display()))?;
    info!("wrote {}", svg_path.display());

    if args.pdf {
        let pdf_path = args.out.join("boxplot.pdf");
        report::pdf::write(&pdf_path, &svg)?;
        info!("wrote {}", pdf_path.display());
    }

    let txt_path = args.out.join("percentiles.txt");
    report::percentiles_txt::write(&txt_path, &dataset)?;
    info!("wrote {}", txt_path.display());

    if args.dump_data {
        let data_path = args.out.join("dataset.json");
        let json = serde_json::to_string_pretty(&dataset)
            .context("failed to serialize dataset")?;
        fs::write(&data_path, json)
            .with_context(|| format!("failed to write {}", data_path.display()))?;
        info!("wrote {}", data_path.display());
    }

    Ok(())
}

fn plot(args: PlotArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }
    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output dir {}", args.out.display()))?;

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let entries = percentiles::parse_entries(&text)
        .with_context(|| format!("invalid percentile file {}", args.input.display()))?;
    if entries.is_empty() {
        bail!("no percentile entries in {}", args.input.display());
    }
    if let Some(labels) = &args.labels {
        if labels.len() != entries.len() {
            bail!(
                "{} labels given for {} percentile entries",
                labels.len(),
                entries.len()
            );
        }
    }

    let opts = PlotOptions {
        redraw: !args.no_redraw,
        print_data: args.print_data,
    };
    let mut canvas = SvgCanvas::new(args.width, args.height)?;
    let artifact =
        report::svg::plot_percentiles(&mut canvas, &entries, args.labels.as_deref(), &opts)?;

    let svg = canvas.finish();
    let svg_path = args.out.join("custom_boxplot.svg");
    fs::write(&svg_path, &svg).with_context(|| format!("failed to write {}", svg_path.display()))?;
    info!("wrote {}", svg_path.display());

    if args.pdf {
        let pdf_path = args.out.join("custom_boxplot.pdf");
        report::pdf::write(&pdf_path, &svg)?;
        info!("wrote {}", pdf_path.display());
    }

    if let Some(dump) = &args.dump {
        let extracted = codec::extract_percentiles(&artifact);
        fs::write(dump, percentiles::entries_to_json(&extracted))
            .with_context(|| format!("failed to write {}", dump.display()))?;
        info!("wrote {}", dump.display());
    }

    Ok(())
}
