// File: crates/timeline-demo/src/main.rs
// Summary: Loads CSV files as corpora, plots document frequency over time and writes the charts as PNGs.

mod csv_corpus;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use timeline_chart::PngRenderer;
use timeline_core::{BucketUnit, CorpusLoader, Dashboard, DashboardConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plot how many documents fall into each time bucket, overall and per metadata value.
#[derive(Parser, Debug)]
#[command(name = "timeline-demo", version)]
struct Cli {
    /// CSV files; each one becomes a corpus named after its file stem.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// TOML dashboard config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus to plot (default: the last input).
    #[arg(long)]
    corpus: Option<String>,

    /// Datetime column to bucket (default: the first one).
    #[arg(long)]
    time_column: Option<String>,

    /// Metadata column for the per-value breakdown chart.
    #[arg(long)]
    group_by: Option<String>,

    #[arg(long, value_parser = parse_bound)]
    start: Option<NaiveDateTime>,

    #[arg(long, value_parser = parse_bound)]
    end: Option<NaiveDateTime>,

    /// Bucket count.
    #[arg(long, default_value_t = 1)]
    every: i64,

    /// Bucket unit: a name (`months`) or alias (`M`, `W`, `min`, ...).
    #[arg(long, default_value = "years")]
    unit: BucketUnit,

    #[arg(long, default_value = "target/out")]
    out: PathBuf,

    /// Also write the overall bucket counts as CSV.
    #[arg(long)]
    counts: Option<PathBuf>,
}

fn parse_bound(s: &str) -> Result<NaiveDateTime, String> {
    csv_corpus::parse_timestamp(s).ok_or_else(|| format!("'{s}' is not a date or timestamp"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .init();

    let loader = Rc::new(CorpusLoader::new());
    for path in &cli.inputs {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("cannot name a corpus after {}", path.display()))?;
        let corpus = csv_corpus::load_corpus(path, &config.document_column)
            .with_context(|| format!("failed to load CSV '{}'", path.display()))?;
        info!(corpus = name, documents = corpus.len(), metas = ?corpus.metas(), "loaded corpus");
        loader.build(name, corpus)?;
    }

    let mut dash = Dashboard::new(loader, PngRenderer::new(config.render_options()), &config);
    if let Some(name) = &cli.corpus {
        ensure!(dash.select_corpus(Some(name)), "unknown corpus '{name}'");
    }
    if let Some(column) = &cli.time_column {
        ensure!(dash.select_time_column(Some(column)), "'{column}' is not a datetime column of the corpus");
    }
    ensure!(
        dash.select_group_column(cli.group_by.as_deref()),
        "'{}' is not a column of the corpus",
        cli.group_by.as_deref().unwrap_or_default()
    );
    if cli.start.is_some() || cli.end.is_some() {
        let (lo, hi) = dash.state().date_range.value().context("the time column holds no timestamps")?;
        dash.set_date_range(cli.start.unwrap_or(lo), cli.end.unwrap_or(hi));
    }
    ensure!(dash.set_bucket_count(cli.every), "--every must be a positive integer, got {}", cli.every);
    dash.set_bucket_unit(cli.unit);

    ensure!(dash.generate(), "nothing was plotted; rerun with RUST_LOG=debug for details");

    let corpus = dash.state().corpus.value().unwrap_or("corpus").to_string();
    std::fs::create_dir_all(&cli.out).with_context(|| format!("creating {}", cli.out.display()))?;
    for (i, chart) in dash.charts().iter().enumerate() {
        let suffix = if i == 0 { "overall" } else { "breakdown" };
        let out = cli.out.join(format!("{corpus}_{suffix}.png"));
        std::fs::write(&out, &chart.png).with_context(|| format!("writing {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    if let Some(path) = &cli.counts {
        write_counts(&dash, path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_counts(dash: &Dashboard<PngRenderer>, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in dash.counts() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
