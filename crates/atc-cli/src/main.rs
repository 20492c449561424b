use anyhow::{bail, Context, Result};
use atc_core::TraceEvent;
use atc_feed::{load_trace_file, LiveFeed, LiveFeedConfig};
use atc_trace::TraceSession;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "atc")]
#[command(about = "Agent Trace Console CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the reconciled trace log
    Trace {
        #[command(subcommand)]
        action: TraceCommands,
    },
    /// Inspect the derived todo plan
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },
    /// Inspect the derived filesystem snapshot
    Fs {
        #[command(subcommand)]
        action: FsCommands,
    },
    /// Follow an execution's live event stream
    Watch {
        /// Event Store WebSocket endpoint
        #[arg(long)]
        url: String,
        /// Execution to subscribe to
        #[arg(long)]
        execution: String,
        /// Seed the session from a historical JSONL file first
        #[arg(long)]
        historical: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TraceCommands {
    Show {
        /// Historical batch JSONL file
        #[arg(long)]
        historical: PathBuf,
        /// Live batch JSONL file
        #[arg(long)]
        live: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    Show {
        #[arg(long)]
        historical: PathBuf,
        #[arg(long)]
        live: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FsCommands {
    Show {
        #[arg(long)]
        historical: PathBuf,
        #[arg(long)]
        live: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Trace { action } => match action {
            TraceCommands::Show { historical, live } => {
                let session = build_session(&historical, live.as_deref())?;
                for event in session.reconciled() {
                    print_event(event);
                }
                println!(
                    "{} events for execution {}",
                    session.reconciled().len(),
                    session.execution_id()
                );
                if session.discarded_foreign() > 0 {
                    println!(
                        "{} events discarded (other executions)",
                        session.discarded_foreign()
                    );
                }
            }
        },
        Commands::Plan { action } => match action {
            PlanCommands::Show { historical, live } => {
                let session = build_session(&historical, live.as_deref())?;
                match session.plan() {
                    Some(plan) => {
                        println!(
                            "plan v{} for execution {}",
                            plan.version,
                            session.execution_id()
                        );
                        for todo in &plan.todos {
                            println!("- [{}] {}: {}", todo.status, todo.id, todo.description);
                        }
                    }
                    None => println!("no plan recorded"),
                }
            }
        },
        Commands::Fs { action } => match action {
            FsCommands::Show { historical, live } => {
                let session = build_session(&historical, live.as_deref())?;
                let snapshot = session.filesystem();
                for node in snapshot.nodes.values() {
                    let size = node
                        .size_bytes
                        .map(|bytes| bytes.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<9} {:>8} {}", node.kind, size, node.path);
                }
                println!("{} entries", snapshot.len());
            }
        },
        Commands::Watch {
            url,
            execution,
            historical,
        } => {
            watch(&url, execution, historical.as_deref()).await?;
        }
    }

    Ok(())
}

/// Load the historical (and optionally live) batch files into a session
/// keyed by the first event's execution id.
fn build_session(historical: &Path, live: Option<&Path>) -> Result<TraceSession> {
    let batch = load_batch(historical)?;
    let Some(first) = batch.first() else {
        bail!("historical file {:?} contains no events", historical);
    };

    let mut session = TraceSession::new(first.execution_id.clone());
    session.replace_historical(batch);
    if let Some(path) = live {
        session.extend_live(load_batch(path)?);
    }
    Ok(session)
}

fn load_batch(path: &Path) -> Result<Vec<TraceEvent>> {
    let load =
        load_trace_file(path).with_context(|| format!("failed to read trace file {path:?}"))?;
    if load.skipped_corrupt_lines > 0 {
        warn!(
            "{}: skipped {} corrupt lines",
            path.display(),
            load.skipped_corrupt_lines
        );
    }
    Ok(load.events)
}

fn print_event(event: &TraceEvent) {
    println!(
        "#{:>5} {:<22} {}",
        event.sequence_number,
        event.event_type,
        event.timestamp.to_rfc3339()
    );
}

/// Seed from the optional historical file, then stream live events and print
/// each newly reconciled entry until Ctrl-C.
async fn watch(url: &str, execution: String, historical: Option<&Path>) -> Result<()> {
    let url = Url::parse(url).context("invalid stream url")?;
    let mut session = TraceSession::new(execution.clone());
    if let Some(path) = historical {
        session.replace_historical(load_batch(path)?);
    }
    for event in session.reconciled() {
        print_event(event);
    }
    let mut printed = session.reconciled().len();

    let (mut rx, handle) = LiveFeed::spawn(LiveFeedConfig {
        url,
        execution_id: execution,
    });

    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(event) => {
                    session.push_live(event);
                    // Replayed frames dedup away; only print genuinely new ones.
                    for event in &session.reconciled()[printed..] {
                        print_event(event);
                    }
                    printed = session.reconciled().len();
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}
