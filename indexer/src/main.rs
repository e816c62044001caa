use anyhow::{bail, Result};
use clap::Parser;
use invindex::persist::{save_index, save_report, save_stats};
use invindex::{build_index, discover_files, PartialSearch};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "indexer")]
#[command(about = "Build a word-level inverted index and run partial-word searches", long_about = None)]
struct Cli {
    /// Directory to index recursively
    #[arg(short = 'd', long = "dir")]
    dir: PathBuf,
    /// Index output file
    #[arg(short = 'i', long = "index", num_args = 0..=1, default_value = "invertedindex.txt", default_missing_value = "invertedindex.txt")]
    index: PathBuf,
    /// Query file, one query per line
    #[arg(short = 'q', long = "query")]
    query: Option<PathBuf>,
    /// Search results output file
    #[arg(short = 'r', long = "results", num_args = 0..=1, default_value = "searchresults.txt", default_missing_value = "searchresults.txt")]
    results: PathBuf,
    /// Extension of files to index
    #[arg(long, default_value = "txt")]
    ext: String,
    /// Worker threads for index construction
    #[arg(short = 't', long, default_value_t = 1)]
    threads: usize,
    /// Optional JSON summary of the built index
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    if !cli.dir.is_dir() {
        bail!("not a valid directory: {}", cli.dir.display());
    }

    let files = discover_files(&cli.dir, &cli.ext);
    tracing::info!(dir = %cli.dir.display(), files = files.len(), "discovered files");

    let (index, summary) = build_index(&files, cli.threads);
    if index.is_empty() {
        tracing::warn!(dir = %cli.dir.display(), "no words indexed");
    }
    tracing::info!(
        indexed = summary.indexed,
        skipped = summary.skipped.len(),
        words = index.num_words(),
        tokens = summary.tokens,
        "ingested files"
    );

    // Output failures abandon that write only; the remaining steps still run.
    match save_index(&cli.index, &index) {
        Ok(()) => tracing::info!(path = %cli.index.display(), "index written"),
        Err(err) => tracing::error!(error = %err, "index not written"),
    }

    if let Some(stats_path) = &cli.stats {
        let created_at = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        match save_stats(stats_path, &index.stats(created_at)) {
            Ok(()) => tracing::info!(path = %stats_path.display(), "stats written"),
            Err(err) => tracing::error!(error = %err, "stats not written"),
        }
    }

    let Some(query) = &cli.query else {
        tracing::info!("no query file given, skipping search");
        return Ok(());
    };

    let mut report = PartialSearch::new();
    if let Err(err) = report.build_partial_search(query, &index) {
        tracing::warn!(error = %err, "query file skipped");
    }
    match save_report(&cli.results, &report) {
        Ok(()) => tracing::info!(path = %cli.results.display(), queries = report.len(), "search results written"),
        Err(err) => tracing::error!(error = %err, "search results not written"),
    }
    Ok(())
}
