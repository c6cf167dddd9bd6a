use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use paperfile_core::config_file::{
    self, ConcurrencyConfig, ConfigFile, ExtractionConfig, FilingConfig, LOCAL_CONFIG_NAME,
};
use paperfile_core::{Config, DEFAULT_MAX_PAGES};
use paperfile_ingest::{Organizer, ProgressEvent};

mod output;

use output::ColorMode;

/// Rename and file academic PDFs as "Title(First Author).pdf"
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rename, file and deduplicate every PDF in the input folders
    Run(RunArgs),

    /// Show the title and author inferred for a single PDF
    Inspect {
        /// Path to the PDF
        file_path: PathBuf,

        /// Number of leading pages to read
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a sample config file
    Init {
        /// Where to write it
        #[arg(default_value = LOCAL_CONFIG_NAME)]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Config file to load on top of the platform and local configs
    #[arg(short, long, env = "PAPERFILE_CONFIG")]
    config: Option<PathBuf>,

    /// Input folder (repeatable); replaces the configured input folders
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,

    /// Folder that receives the renamed copies
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Folder that receives the originals after filing
    #[arg(long)]
    processed: Option<PathBuf>,

    /// Documents extracted in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// Number of leading pages to read from each document
    #[arg(long)]
    max_pages: Option<usize>,

    /// Leave originals in the input folders
    #[arg(long)]
    no_move: bool,

    /// Report what would happen without copying or moving anything
    #[arg(long)]
    dry_run: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl RunArgs {
    /// Command-line settings as a config layer that wins over every file.
    fn overlay(&self) -> ConfigFile {
        let path_string = |p: &PathBuf| p.to_string_lossy().into_owned();
        ConfigFile {
            input_folders: (!self.inputs.is_empty())
                .then(|| self.inputs.iter().map(path_string).collect()),
            input_folder: None,
            output_folder: self.output.as_ref().map(path_string),
            processed_folder: self.processed.as_ref().map(path_string),
            extraction: Some(ExtractionConfig {
                max_pages: self.max_pages,
            }),
            concurrency: Some(ConcurrencyConfig {
                num_workers: self.workers,
            }),
            filing: Some(FilingConfig {
                move_processed: self.no_move.then_some(false),
            }),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let show_progress = match &cli.command {
        Command::Run(args) => !cli.quiet && !args.no_progress,
        _ => false,
    };
    init_tracing(cli.verbose, cli.quiet, show_progress);

    let color = ColorMode(!cli.no_color);
    match cli.command {
        Command::Run(args) => run(args, show_progress, cli.quiet, color).await,
        Command::Inspect {
            file_path,
            max_pages,
            json,
        } => inspect(&file_path, max_pages, json, color),
        Command::Init { path } => init(&path, color),
    }
}

fn init_tracing(verbose: bool, quiet: bool, show_progress: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else if show_progress {
        // Per-file info lines would fight with the bar.
        "warn"
    } else {
        "info"
    };
    let filter = format!("warn,paperfile={level}");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();
}

async fn run(args: RunArgs, show_progress: bool, quiet: bool, color: ColorMode) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    // Resolve configuration: CLI flags > --config > ./paperfile.toml > platform config
    let file = config_file::load_config(args.config.as_deref())?;
    let file = config_file::merge(file, args.overlay());
    let mut config = Config::from_file(&file)?;
    config.dry_run = args.dry_run;
    let dry_run = config.dry_run;

    let backend = paperfile_ingest::default_backend()?;

    let bar = if show_progress {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len} (eta {eta})",
            )
            .unwrap()
            .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    } else {
        ProgressBar::hidden()
    };

    let progress_bar = bar.clone();
    let progress_cb = move |event: ProgressEvent| {
        match &event {
            ProgressEvent::Discovered { total } => {
                progress_bar.set_length(*total as u64);
                progress_bar.set_message("Filing");
            }
            _ => progress_bar.inc(1),
        }
        if quiet {
            return;
        }
        if let Some(line) = output::format_progress(&event, dry_run, color) {
            if progress_bar.is_hidden() {
                println!("{line}");
            } else {
                progress_bar.println(line);
            }
        }
    };

    let cancel = CancellationToken::new();

    // Set up Ctrl+C handler
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let stats = Organizer::new(config, backend).run(progress_cb, cancel).await?;
    bar.finish_and_clear();

    if stats.found == 0 {
        println!("No PDF files found in the input folders.");
        return Ok(());
    }
    if !quiet {
        output::print_summary(&mut io::stdout(), &stats, dry_run, color)?;
    }
    Ok(())
}

fn inspect(file_path: &Path, max_pages: usize, json: bool, color: ColorMode) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    if max_pages == 0 {
        anyhow::bail!("--max-pages must be at least 1");
    }

    let extraction = paperfile_ingest::inspect(file_path, max_pages)?;
    let extractor = paperfile_ingest::MetadataExtractor::new();
    let paper = extraction.to_paper_metadata(extractor.config());
    let filename = paperfile_ingest::paper_filename(&paper);

    let mut stdout = io::stdout();
    if json {
        let report = output::InspectReport {
            file: file_path.display().to_string(),
            extraction: &extraction,
            full_title: &paper.title,
            filename,
        };
        writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        output::print_inspection(&mut stdout, file_path, &extraction, &paper, &filename, color)?;
    }
    Ok(())
}

fn init(path: &Path, color: ColorMode) -> anyhow::Result<()> {
    config_file::save_config(&ConfigFile::sample(), path)?;
    let msg = format!("Wrote sample config to {}", path.display());
    if color.enabled() {
        use owo_colors::OwoColorize;
        println!("{}", msg.green());
    } else {
        println!("{}", msg);
    }
    println!("Edit `input_folders`, then run: paperfile run");
    Ok(())
}
