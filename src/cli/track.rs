//! `worklog track` command implementation.

use crate::cli::history::render_history;
use crate::cli::stats::render_stats;
use crate::client::StorageClient;
use crate::config::ClientConfig;
use crate::core::Session;
use crate::error::Result;
use crate::workbench::Workbench;
use std::future::Future;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Commands accepted on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a work session.
    Start,
    /// Stop the running session.
    Stop,
    /// Show state, timer and clock.
    Status,
    /// Show today's statistics.
    Stats,
    /// Show recent sessions.
    History,
    /// List commands.
    Help,
    /// Stop any running session and exit.
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "s" => Ok(Self::Start),
            "stop" | "x" => Ok(Self::Stop),
            "status" | "" => Ok(Self::Status),
            "stats" => Ok(Self::Stats),
            "history" | "h" => Ok(Self::History),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

const HELP: &str = "\
Commands:
  start    begin a work session
  stop     end the running session and save it
  status   show state and timer
  stats    show today's totals
  history  show the last 10 sessions
  quit     stop any running session and exit";

/// Run the interactive tracker until `quit`, end of input or Ctrl+C.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub async fn run(config: &ClientConfig, offline: bool) -> Result<()> {
    let client = if offline {
        None
    } else {
        Some(StorageClient::new(config)?)
    };

    let mut bench = Workbench::load(client).await;
    println!("{}", bench.status());
    println!("{HELP}");

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let input = BufReader::new(tokio::io::stdin());
    if let Some(session) = drive(&mut bench, input, interrupt).await {
        println!("Stopped session started at {}", session.start_time);
    }
    Ok(())
}

/// Feed commands from `input` to `bench` until `quit`, end of input, a read
/// error or `interrupt` resolves. Any running session is then stopped and its
/// save awaited; the stopped session is returned.
pub async fn drive<R, F>(bench: &mut Workbench, input: R, interrupt: F) -> Option<Session>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let mut lines = input.lines();

    loop {
        let line = tokio::select! {
            biased;
            line = lines.next_line() => line,
            () = &mut interrupt => {
                info!("interrupted");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        println!("{}", execute(bench, command));
    }

    bench.finish().await
}

/// Apply one command and render the reply.
pub fn execute(bench: &mut Workbench, command: Command) -> String {
    match command {
        Command::Start => match bench.start() {
            Ok(_) => bench.status().to_string(),
            Err(e) => e.to_string(),
        },
        Command::Stop => match bench.stop() {
            Ok(stopped) => format!(
                "{}\n{}",
                bench.status(),
                render_stats(&stopped.stats).trim_end()
            ),
            Err(e) => e.to_string(),
        },
        Command::Status => bench.status().to_string(),
        Command::Stats => render_stats(&bench.stats()).trim_end().to_string(),
        Command::History => render_history(&bench.history()).trim_end().to_string(),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}
