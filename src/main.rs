use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod board;
mod collate;
mod headers;
mod models;
mod render;
mod report;
mod sheet;
mod state;
mod times;

use collate::{Collation, KoreanCollation};
use state::{BoardSlot, LoadOutcome};

const DEFAULT_POLL_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "timetrial-leaderboard")]
#[command(about = "Time-trial leaderboard viewer for a published spreadsheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the sheet once and print the leaderboard
    Show {
        /// CSV export URL of the published sheet (falls back to SHEET_CSV_URL)
        #[arg(long)]
        url: Option<String>,
        /// Case-insensitive filter on nickname, name, or student id
        #[arg(long)]
        search: Option<String>,
    },
    /// Poll the sheet and keep the leaderboard on screen
    Watch {
        /// CSV export URL of the published sheet (falls back to SHEET_CSV_URL)
        #[arg(long)]
        url: Option<String>,
        /// Poll interval in seconds
        #[arg(long, default_value_t = DEFAULT_POLL_SECS)]
        interval: u64,
    },
    /// Write a leaderboard snapshot to a file
    Export {
        /// CSV export URL of the published sheet (falls back to SHEET_CSV_URL)
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value = "leaderboard.md")]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "markdown")]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Markdown,
    Json,
}

fn sheet_url(flag: Option<String>) -> anyhow::Result<String> {
    match flag {
        Some(url) => Ok(url),
        None => std::env::var("SHEET_CSV_URL")
            .context("pass --url or set SHEET_CSV_URL to the published CSV export URL"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetrial_leaderboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Show { url, search } => {
            show(&client, &sheet_url(url)?, search.as_deref().unwrap_or("")).await
        }
        Commands::Watch { url, interval } => {
            watch(
                &client,
                &sheet_url(url)?,
                Duration::from_secs(interval.max(1)),
            )
            .await
        }
        Commands::Export { url, out, format } => {
            export(&client, &sheet_url(url)?, &out, format).await
        }
    }
}

async fn show(client: &reqwest::Client, url: &str, search: &str) -> anyhow::Result<()> {
    let mut slot = BoardSlot::new();
    let generation = slot.begin_load();
    let result = sheet::load(client, url).await.map_err(|err| format!("{err:#}"));
    let failed = result.is_err();
    slot.complete(generation, result);

    println!("{}", render::render_frame(&slot, search, &KoreanCollation));

    if failed {
        anyhow::bail!("불러오지 못했습니다.");
    }
    Ok(())
}

async fn export(
    client: &reqwest::Client,
    url: &str,
    out: &std::path::Path,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let outcome = sheet::load(client, url).await?;
    let board = board::build_leaderboard(&outcome.records, "", &KoreanCollation);

    let contents = match format {
        ExportFormat::Markdown => report::build_markdown(&board, &outcome),
        ExportFormat::Json => report::build_json(&board, &outcome)?,
    };

    std::fs::write(out, contents)?;
    println!("Leaderboard written to {}.", out.display());
    Ok(())
}

enum LoopEvent {
    Loaded {
        generation: u64,
        result: Result<LoadOutcome, String>,
    },
}

fn spawn_load(
    client: &reqwest::Client,
    url: &str,
    slot: &mut BoardSlot,
    tx: &mpsc::Sender<LoopEvent>,
) {
    let generation = slot.begin_load();
    let client = client.clone();
    let url = url.to_string();
    let tx = tx.clone();

    tokio::spawn(async move {
        let result = sheet::load(&client, &url).await.map_err(|err| format!("{err:#}"));
        let _ = tx.send(LoopEvent::Loaded { generation, result }).await;
    });
}

fn redraw(slot: &BoardSlot, query: &str, collation: &dyn Collation) {
    // Clear the screen and repaint the whole frame.
    print!("\x1b[2J\x1b[1;1H");
    println!("{}", render::render_frame(slot, query, collation));
    println!("검색어 입력 = 필터 · 빈 줄 = 새로고침 · / = 필터 해제 · q = 종료");
}

/// Keep the board on screen: reload on every poll tick or blank input
/// line, re-render the current dataset when the search filter changes.
/// Loads run as spawned tasks; overlapping completions are resolved by
/// the slot's generation counter.
async fn watch(client: &reqwest::Client, url: &str, poll: Duration) -> anyhow::Result<()> {
    let collation = KoreanCollation;
    let mut slot = BoardSlot::new();
    let mut query = String::new();

    let (tx, mut rx) = mpsc::channel::<LoopEvent>(8);

    // First tick fires immediately and doubles as the initial load.
    let mut tick = tokio::time::interval(poll);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdin_open = true;

    info!(url, poll_secs = poll.as_secs(), "starting watch loop");

    loop {
        tokio::select! {
            _ = tick.tick() => {
                spawn_load(client, url, &mut slot, &tx);
                redraw(&slot, &query, &collation);
            }
            event = rx.recv() => {
                let Some(LoopEvent::Loaded { generation, result }) = event else {
                    break;
                };
                if slot.complete(generation, result) {
                    info!(generation, entries = slot.records().len(), "load applied");
                    redraw(&slot, &query, &collation);
                } else {
                    debug!(generation, "discarded stale load result");
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(input)) => {
                        let input = input.trim();
                        if input == "q" {
                            break;
                        }
                        if input.is_empty() {
                            spawn_load(client, url, &mut slot, &tx);
                        } else if input == "/" {
                            query.clear();
                        } else {
                            query = input.to_string();
                        }
                        redraw(&slot, &query, &collation);
                    }
                    // Stdin closed: keep polling, just stop reading input.
                    Ok(None) => {
                        stdin_open = false;
                    }
                    Err(err) => {
                        warn!(%err, "stdin read failed");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    Ok(())
}
