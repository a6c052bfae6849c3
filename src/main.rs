//! CLI entry point for `vkrescue`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use vkrescue::config::Config;
use vkrescue::fetch::{FetchPolicy, Fetcher};
use vkrescue::model::outcome::OutcomeKind;
use vkrescue::pipeline::summary::RunSummary;
use vkrescue::pipeline::{Pipeline, PipelineOptions};

#[derive(Parser)]
#[command(name = "vkrescue", version, about = "Recover photos from a VK data export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Re-download files that already exist in the destination
    #[arg(short, long, global = true)]
    force: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Albums or chats processed at the same time
    #[arg(long, value_name = "N", global = true)]
    workers: Option<usize>,

    /// Attempts per image before giving up on server errors
    #[arg(long, value_name = "N", global = true)]
    attempts: Option<u32>,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every image referenced by album pages
    Albums {
        /// Folder holding the album `*.html` pages
        #[arg(long, value_name = "DIR")]
        root_dir: PathBuf,
        /// Folder the albums are written to
        #[arg(long, value_name = "DIR")]
        download_dir: PathBuf,
    },
    /// Download every image attached to chat messages
    Chats {
        /// Folder holding one subfolder per conversation
        #[arg(long, value_name = "DIR")]
        root_dir: PathBuf,
        /// Folder the conversations are written to
        #[arg(long, value_name = "DIR")]
        download_dir: PathBuf,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[derive(Clone, Copy)]
enum Mode {
    Albums,
    Chats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = vkrescue::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    if let Some(workers) = cli.workers {
        config.fetch.concurrent_units = workers;
    }
    if let Some(attempts) = cli.attempts {
        config.fetch.max_attempts = attempts;
    }
    config.fetch.validate()?;

    match cli.command {
        Commands::Albums {
            ref root_dir,
            ref download_dir,
        } => cmd_run(Mode::Albums, root_dir, download_dir, &config, cli.force, cli.json).await,
        Commands::Chats {
            ref root_dir,
            ref download_dir,
        } => cmd_run(Mode::Chats, root_dir, download_dir, &config, cli.force, cli.json).await,
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = vkrescue::config::log_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "vkrescue.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Run one recovery mode end to end and print the summary.
async fn cmd_run(
    mode: Mode,
    root_dir: &Path,
    download_dir: &Path,
    config: &Config,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let fetcher = Fetcher::new(&config.fetch.user_agent, config.fetch.timeout(), cancel)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Recovering [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    let progress_bar = pb.clone();

    let pipeline = Pipeline::new(
        fetcher,
        PipelineOptions {
            concurrent_units: config.fetch.concurrent_units,
            concurrent_fetches: config.fetch.concurrent_fetches,
        },
    )
    .with_progress(Box::new(move |done, total| {
        progress_bar.set_length(total as u64);
        progress_bar.set_position(done as u64);
    }));

    let start = Instant::now();
    let summary = match mode {
        Mode::Albums => {
            let policy: FetchPolicy = config.fetch.policy(config.mime.albums_policy(), force);
            pipeline.run_albums(root_dir, download_dir, &policy).await?
        }
        Mode::Chats => {
            let policy: FetchPolicy = config.fetch.policy(config.mime.chats_policy(), force);
            pipeline.run_chats(root_dir, download_dir, &policy).await?
        }
    };
    pb.finish_and_clear();
    let elapsed = start.elapsed();

    if json {
        print_summary_json(download_dir, &summary, elapsed)?;
    } else {
        print_summary_table(download_dir, &summary, elapsed);
    }

    Ok(())
}

/// Cancel the run on the first Ctrl-C. Files already written stay.
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing up");
            cancel.cancel();
        }
    });
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "vkrescue", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Print the run summary as a human-readable table.
fn print_summary_table(download_dir: &Path, summary: &RunSummary, elapsed: std::time::Duration) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<25} {}", "Destination", download_dir.display());
    println!("  {:<25} {}", "Units processed", summary.units_processed);
    if summary.units_skipped > 0 {
        println!("  {:<25} {}", "Units skipped", summary.units_skipped);
    }
    for kind in OutcomeKind::ALL {
        let count = summary.count(kind);
        if count > 0 || kind == OutcomeKind::Downloaded {
            println!("  {:<25} {}", kind.label(), count);
        }
    }
    println!(
        "  {:<25} {}",
        "Downloaded size",
        format_size(summary.bytes_downloaded, BINARY)
    );
    println!("  {:<25} {:.2?}", "Elapsed", elapsed);
    println!();
}

/// Print the run summary as JSON.
fn print_summary_json(
    download_dir: &Path,
    summary: &RunSummary,
    elapsed: std::time::Duration,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "destination": download_dir.to_string_lossy(),
        "summary": summary,
        "elapsed_ms": elapsed.as_millis(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
