use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use the library instead of redeclaring modules
use m3u_curator::{
    config::{Config, ProbeConfig},
    pipeline::{CheckOptions, ConvertOptions, Orchestrator},
    utils::StandardProbeClient,
};

#[derive(Parser)]
#[command(name = "m3u-curator")]
#[command(version)]
#[command(about = "Deduplicate, health-check and rewrite M3U channel playlists")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "m3u-curator.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert JSON feed files into an M3U playlist, then test and clean it
    Convert(ConvertArgs),
    /// Test the stream URLs of an M3U playlist
    Check(CheckArgs),
}

/// Probe tuning shared by both commands
#[derive(Args)]
struct ProbeArgs {
    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,
}

impl ProbeArgs {
    fn apply(&self, mut probe: ProbeConfig) -> Result<ProbeConfig> {
        if let Some(timeout) = self.timeout {
            probe.timeout = Duration::from_secs(timeout);
        }
        if let Some(workers) = self.workers {
            probe.concurrency = workers;
        }
        probe.validate()?;
        Ok(probe)
    }
}

#[derive(Args)]
struct ConvertArgs {
    /// Folder containing JSON files
    #[arg(long, value_name = "DIR")]
    json_folder: Option<PathBuf>,

    /// Output M3U file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip testing the created M3U file
    #[arg(long)]
    no_test: bool,

    /// Skip the backup before cleaning the created file
    #[arg(long)]
    no_backup: bool,

    #[command(flatten)]
    probe: ProbeArgs,
}

#[derive(Args)]
struct CheckArgs {
    /// Path to M3U file
    file: PathBuf,

    /// Save detailed report to file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Quiet mode - only show summary
    #[arg(short, long)]
    quiet: bool,

    /// Split streams into working and notworking M3U files
    #[arg(long)]
    split: bool,

    /// Update original file to remove failed streams (creates backup)
    #[arg(long)]
    update_original: bool,

    /// Skip backup when updating original file
    #[arg(long)]
    no_backup: bool,

    /// Custom name for working streams file (default: [original]_working.m3u)
    #[arg(long, value_name = "FILE")]
    working_file: Option<PathBuf>,

    /// Custom name for not working streams file (default: [original]_notworking.m3u)
    #[arg(long, value_name = "FILE")]
    notworking_file: Option<PathBuf>,

    #[command(flatten)]
    probe: ProbeArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = format!("m3u_curator={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting M3U Curator v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_from_file(&cli.config)?;
    let orchestrator = Orchestrator::new(config.output.clone());

    match cli.command {
        Command::Convert(args) => {
            let probe = args.probe.apply(ProbeConfig {
                user_agent: config.probe.user_agent.clone(),
                max_redirects: config.probe.max_redirects,
                ..ProbeConfig::for_convert()
            })?;
            let options = ConvertOptions {
                feed_folder: args.json_folder.unwrap_or(config.ingestion.feed_folder),
                output_file: args.output.unwrap_or(config.ingestion.output_file),
                run_check: !args.no_test,
                backup: !args.no_backup,
                probe,
            };

            let client = StandardProbeClient::new(&options.probe)?;
            let outcome = orchestrator.convert(client, &options).await?;
            if let Some(check) = &outcome.check {
                report_output_errors(check.errors.len());
            }
        }
        Command::Check(args) => {
            let mut probe = args.probe.apply(config.probe.clone())?;
            probe.quiet |= args.quiet;

            let options = CheckOptions {
                report_file: args.output,
                split: args.split,
                update_original: args.update_original,
                backup: !args.no_backup,
                working_file: args.working_file,
                not_working_file: args.notworking_file,
                ..CheckOptions::new(args.file, probe)
            };

            let client = StandardProbeClient::new(&options.probe)?;
            let outcome = orchestrator.check(client, &options).await?;
            report_output_errors(outcome.errors.len());
        }
    }

    Ok(())
}

fn report_output_errors(count: usize) {
    if count > 0 {
        warn!("{} output file(s) could not be written", count);
    }
}
