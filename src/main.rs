mod fetch;
mod parser;
mod render;
mod settings;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use parser::table::SpanMode;
use parser::{AssembleOptions, Document, ExtractError};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "wiki_sections",
    about = "Split wiki articles into heading-keyed text, list and table blocks"
)]
struct Cli {
    /// Table span handling (default: WIKI_SPAN_MODE or legacy)
    #[arg(long, value_enum, global = true)]
    mode: Option<SpanMode>,
    /// Directory for JSON output (default: WIKI_OUTPUT_DIR or ./data)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Don't write JSON files
    #[arg(long, global = true)]
    no_save: bool,
    /// Don't print documents to the console
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Treat a page without a content container as an error instead of empty
    #[arg(long, global = true)]
    require_content: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch pages over HTTP and process each one
    Fetch {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Process saved HTML files in parallel
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Where finished documents go.
struct Output {
    dir: PathBuf,
    suffix: String,
    save: bool,
    print: bool,
}

#[derive(Default)]
struct RunCounts {
    ok: usize,
    failed: usize,
}

impl RunCounts {
    fn print(&self) {
        println!("Processed {} documents ({} failed).", self.ok, self.failed);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let options = AssembleOptions {
        mode: cli.mode.unwrap_or(settings.span_mode),
        require_content_root: cli.require_content,
    };
    let output = Output {
        dir: cli.out_dir.unwrap_or_else(|| settings.output_dir.clone()),
        suffix: settings.output_suffix.clone(),
        save: !cli.no_save,
        print: !cli.quiet,
    };
    info!(mode = ?options.mode, "Starting");

    let counts = match cli.command {
        Commands::Fetch { urls } => run_fetch(&urls, &settings, options, &output).await?,
        Commands::Parse { files } => run_parse(&files, options, &output)?,
    };
    counts.print();

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    if counts.ok == 0 {
        anyhow::bail!("No documents produced ({} failed)", counts.failed);
    }
    Ok(())
}

/// Fetch each URL in turn. A failed fetch yields no document and the run moves on.
async fn run_fetch(
    urls: &[String],
    settings: &Settings,
    options: AssembleOptions,
    output: &Output,
) -> anyhow::Result<RunCounts> {
    let fetcher = fetch::Fetcher::new(&settings.fetch())?;
    let mut counts = RunCounts::default();

    for url in urls {
        let html = match fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                error!("Fetch failed for {}: {:#}", url, e);
                counts.failed += 1;
                continue;
            }
        };
        emit(url, parser::process_html(&html, options), output, &mut counts);
    }

    Ok(counts)
}

/// Parse local files in parallel, then emit in argument order.
fn run_parse(files: &[PathBuf], options: AssembleOptions, output: &Output) -> anyhow::Result<RunCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = read_and_process(path, options);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = RunCounts::default();
    for (path, result) in files.iter().zip(results) {
        let source = path.display().to_string();
        match result {
            Ok(doc) => emit(&source, Ok(doc), output, &mut counts),
            Err(e) => {
                error!("Skipping {}: {:#}", source, e);
                counts.failed += 1;
            }
        }
    }

    Ok(counts)
}

fn read_and_process(path: &Path, options: AssembleOptions) -> anyhow::Result<Document> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parser::process_html(&html, options)?)
}

fn emit(
    source: &str,
    result: Result<Document, ExtractError>,
    output: &Output,
    counts: &mut RunCounts,
) {
    let doc = match result {
        Ok(doc) => doc,
        Err(e) => {
            error!("Skipping {}: {}", source, e);
            counts.failed += 1;
            return;
        }
    };

    if output.print {
        render::print(&doc);
    }
    if output.save {
        if let Err(e) = store::save_document(&doc, &output.dir, &output.suffix) {
            error!("Save failed for {}: {:#}", source, e);
            counts.failed += 1;
            return;
        }
    }
    counts.ok += 1;
}
