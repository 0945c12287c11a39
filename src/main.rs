//! worklog CLI - personal work-session tracker.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use worklog::{cli, config};

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
/// - Dirty working directory: "0.1.0-dev (abc1234-dirty)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("WORKLOG_GIT_HASH");
    const IS_RELEASE: &str = env!("WORKLOG_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "worklog")]
#[command(author, version = version(), about = "Personal work-session tracker", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the storage endpoint (POST /save, GET /sessions).
    Serve {
        /// Listen port. Defaults to 3000.
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind. Defaults to 127.0.0.1.
        #[arg(long)]
        host: Option<String>,

        /// JSON file holding saved sessions.
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Track work interactively (commands on stdin).
    Track {
        /// Storage endpoint base URL.
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Keep sessions in memory only.
        #[arg(long)]
        offline: bool,
    },

    /// Show today's totals from the data file.
    Stats {
        /// JSON file holding saved sessions.
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Show the last 10 sessions from the data file.
    History {
        /// JSON file holding saved sessions.
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("worklog={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}

async fn run(cli: Cli) -> worklog::Result<()> {
    let mut config = config::load_config()?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            data_file,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(path) = data_file {
                config.storage.data_file = path;
            }
            cli::serve::run(&config).await
        }
        Commands::Track { endpoint, offline } => {
            if let Some(endpoint) = endpoint {
                config.client.endpoint = endpoint;
            }
            cli::track::run(&config.client, offline).await
        }
        Commands::Stats { data_file } => {
            cli::stats::run(&data_file.unwrap_or(config.storage.data_file))
        }
        Commands::History { data_file } => {
            cli::history::run(&data_file.unwrap_or(config.storage.data_file))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("worklog: error: {e}");
            ExitCode::FAILURE
        }
    }
}
