use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use testforge_batcher::{test_artifact_name, Batch, BatchPlanner, PlannerConfig};
use testforge_extractor::{BlockRecord, Extractor, Language};

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "testforge")]
#[command(about = "Extract callable units and plan generation batches", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract callable-unit metadata from a Python or Java source file
    Extract(ExtractArgs),

    /// Extract and pack units into token-bounded batches
    Plan(PlanArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Source file to analyze (.py or .java)
    file: PathBuf,

    /// Directory to write summary.json into; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PlanArgs {
    /// Source file to analyze (.py or .java)
    file: PathBuf,

    /// Maximum cumulative token weight per batch
    #[arg(long, default_value_t = 195_000)]
    max_batch_tokens: usize,

    /// Directory to write batches.json into; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Batch manifest entry: what the dispatcher would receive, by id and weight
#[derive(Serialize)]
struct BatchSummary<'a> {
    batch: usize,
    estimated_tokens: usize,
    record_ids: Vec<&'a str>,
}

#[derive(Serialize)]
struct PlanManifest<'a> {
    language: Language,
    artifact_name: String,
    max_batch_tokens: usize,
    batches: Vec<BatchSummary<'a>>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Plan(args) => run_plan(args),
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let records = extract_records(&args.file)?;
    log::info!("found {} functions/methods to test", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    emit(&json, args.output.as_deref(), "summary.json")
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let records = extract_records(&args.file)?;
    let language = Language::from_path(&args.file);
    let artifact_name = test_artifact_name(&records, language);

    let planner = BatchPlanner::new(PlannerConfig {
        max_tokens_per_batch: args.max_batch_tokens,
    });
    let batches = planner.plan(records);
    log::info!("planned {} batch(es) for {artifact_name}", batches.len());

    let manifest = PlanManifest {
        language,
        artifact_name,
        max_batch_tokens: args.max_batch_tokens,
        batches: batches
            .iter()
            .enumerate()
            .map(|(idx, batch)| summarize(idx, batch))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&manifest)?;
    emit(&json, args.output.as_deref(), "batches.json")
}

fn extract_records(file: &Path) -> Result<Vec<BlockRecord>> {
    Extractor::new()
        .extract_file(file)
        .with_context(|| format!("failed to extract blocks from {}", file.display()))
}

fn summarize(idx: usize, batch: &Batch) -> BatchSummary<'_> {
    BatchSummary {
        batch: idx,
        estimated_tokens: batch.estimated_tokens,
        record_ids: batch.record_ids(),
    }
}

fn emit(json: &str, output: Option<&Path>, file_name: &str) -> Result<()> {
    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = dir.join(file_name);
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => print_stdout(json),
    }
}
