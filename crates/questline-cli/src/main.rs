//! questline: terminal HUD that walks `quests.json` and tracks completions.
//!
//! stdout は HUD の描画専用、tracing の出力は stderr へ。

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::TimeDelta;
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use questline_core::app::{Scheduler, SessionBuilder};
use questline_core::config::{HudConfig, MalformedPolicy};
use questline_core::impls::json_file::{DIRECTIVES_FILE, STATS_FILE};
use questline_core::impls::{
    JsonFileDirectiveSource, JsonFileStatsStore, TextRenderer, spawn_line_reader,
};

/// 30 日。これより長い期限は HUD として意味がない
const MAX_QUEST_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Quest HUD: type a quest name to mark it done, `exit` to quit.
#[derive(Debug, Parser)]
#[command(name = "questline", version, about)]
struct Cli {
    /// Directory holding quests.json and quest_stats.json (default: next to the executable).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Override the directive file path.
    #[arg(long)]
    quests: Option<PathBuf>,

    /// Override the stats file path.
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Tick interval in milliseconds.
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Seconds until a pushed quest is shown as expired.
    #[arg(
        long,
        default_value_t = 120,
        value_parser = clap::value_parser!(i64).range(0..=MAX_QUEST_TTL_SECS)
    )]
    quest_ttl_secs: i64,

    /// Number of diagnostic lines kept on screen.
    #[arg(long, default_value_t = 50)]
    log_lines: usize,

    /// Skip malformed directives instead of retrying them every tick.
    #[arg(long)]
    skip_malformed: bool,

    /// Disable the synthetic noise lines.
    #[arg(long)]
    no_noise: bool,

    /// Do not clear the screen between frames.
    #[arg(long)]
    no_clear: bool,
}

impl Cli {
    fn config(&self) -> HudConfig {
        HudConfig {
            quest_ttl: TimeDelta::seconds(self.quest_ttl_secs),
            tick_interval: Duration::from_millis(self.tick_ms),
            log_capacity: self.log_lines,
            noise: !self.no_noise,
            malformed_policy: if self.skip_malformed {
                MalformedPolicy::Skip
            } else {
                MalformedPolicy::Retry
            },
            ..HudConfig::default()
        }
    }

    fn resolve_base_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.base_dir {
            return Ok(dir.clone());
        }
        let exe = std::env::current_exe().context("failed to locate the executable")?;
        exe.parent()
            .map(Path::to_path_buf)
            .context("executable has no parent directory")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout is the HUD; keep diagnostics on stderr and quiet by default.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("questline=warn,questline_core=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let base_dir = cli.resolve_base_dir()?;
    let quests_path = cli
        .quests
        .clone()
        .unwrap_or_else(|| base_dir.join(DIRECTIVES_FILE));
    let stats_path = cli
        .stats
        .clone()
        .unwrap_or_else(|| base_dir.join(STATS_FILE));

    tracing::info!(
        base_dir = %base_dir.display(),
        quests = %quests_path.display(),
        stats = %stats_path.display(),
        "questline starting"
    );

    let scheduler = Scheduler::new(config.tick_interval);
    let mut session = SessionBuilder::new(config)
        .directives(JsonFileDirectiveSource::new(quests_path))
        .stats_store(JsonFileStatsStore::new(stats_path))
        .base_dir(&base_dir)
        .build()
        .context("failed to build session")?;

    let (input_tx, input_rx) = mpsc::channel(16);
    // stdin で止まっているスレッドは join しない（main を抜ければ終わる）
    let _reader = spawn_line_reader(BufReader::new(std::io::stdin()), input_tx);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    let mut renderer = TextRenderer::new(std::io::stdout(), !cli.no_clear);
    let reason = scheduler
        .run(&mut session, &mut renderer, input_rx, shutdown_rx)
        .await;

    tracing::info!(?reason, "questline stopped");
    Ok(())
}
