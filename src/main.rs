use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{error, info};

use seams_align::{
    resolve_inputs, write_documents, write_stats, DiscoveryConfig, FileStats, LoaderConfig, OutputMode,
    RegexTokenizer, ReviewLoader, RunStats,
};

#[derive(Parser, Debug)]
#[command(name = "seams-align")]
#[command(about = "Aligns tokenizer output back onto review texts as character spans")]
#[command(version)]
struct Args {
    /// JSON-lines review files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Skip lines that are not valid JSON instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Maximum number of documents built concurrently
    #[arg(long, default_value_t = num_cpus::get())]
    concurrency: usize,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Document output file (JSON lines); stdout when absent
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,

    /// Emit encoded POS/shape/label features instead of spans
    #[arg(long)]
    encode: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging on stderr keeps stdout free for document output
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting seams-align");
    info!(?args, "Parsed CLI arguments");

    let inputs = resolve_inputs(&args.inputs, &DiscoveryConfig { fail_fast: true })?;

    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };
    let mut writer = BufWriter::new(writer);

    let loader = ReviewLoader::new(
        Arc::new(RegexTokenizer::new()?),
        LoaderConfig {
            skip_malformed: args.skip_malformed,
            concurrency: args.concurrency,
            ..Default::default()
        },
    );
    let mode = if args.encode { OutputMode::Encoded } else { OutputMode::Spans };

    let progress = progress_bar(inputs.len() as u64, args.no_progress);
    let start_time = std::time::Instant::now();
    let mut run_stats = RunStats::started_now();
    let mut first_error = None;

    for path in &inputs {
        progress.set_message(path.display().to_string());
        match process_input(&loader, path, args.use_mmap, &mut writer, mode).await {
            Ok(file_stats) => run_stats.record(file_stats),
            Err(e) => {
                error!("Failed to process {}: {:#}", path.display(), e);
                run_stats.record(FileStats::failed(path, &e));
                first_error.get_or_insert(e);
            }
        }
        progress.inc(1);
    }
    writer.flush().await?;
    progress.finish_and_clear();

    run_stats.total_processing_time_ms = start_time.elapsed().as_millis() as u64;
    write_stats(&args.stats_out, &run_stats).await?;

    info!(
        "Run completed: {} files processed, {} failed, {} documents",
        run_stats.files_processed, run_stats.files_failed, run_stats.total_documents
    );

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn process_input<W>(
    loader: &ReviewLoader,
    path: &Path,
    use_mmap: bool,
    writer: &mut BufWriter<W>,
    mode: OutputMode,
) -> Result<FileStats>
where
    W: AsyncWrite + Unpin,
{
    let (documents, load_stats) = if use_mmap {
        loader.load_file_mmap(path).await?
    } else {
        loader.load_file(path).await?
    };
    write_documents(writer, &documents, mode).await?;
    Ok(FileStats::success(path, load_stats))
}

fn progress_bar(len: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} files {msg}") {
        progress.set_style(style);
    }
    progress
}
