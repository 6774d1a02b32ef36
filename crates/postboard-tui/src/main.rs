//! `postboard-tui`: browse posts and their authors in the terminal.
//!
//! The board fetches both collections in the background while the UI
//! shows a loading line; once ready, the control bar (page size, sort
//! order, page) and the pager drive the board's event bus and every
//! recomputed page is pushed back into the UI loop.
//!
//! Logs go to a file (default `/tmp/postboard-tui.log`) so they never
//! tear the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use postboard_config::Config;
use postboard_core::{BoardConfig, PolicyPreset};

use crate::app::App;

/// Terminal board for paging through posts and their authors.
#[derive(Parser, Debug)]
#[command(name = "postboard-tui", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "POSTBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Posts collection URL (overrides config)
    #[arg(long)]
    posts_url: Option<String>,

    /// Users collection URL (overrides config)
    #[arg(long)]
    users_url: Option<String>,

    /// Pagination rules (overrides config)
    #[arg(long)]
    policy: Option<PolicyArg>,

    /// Accept any TLS certificate
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/postboard-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Legacy,
    Corrected,
}

impl From<PolicyArg> for PolicyPreset {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Legacy => Self::Legacy,
            PolicyArg::Corrected => Self::Corrected,
        }
    }
}

/// File-only tracing. Hold the guard until exit so buffered lines flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("postboard_tui={level},postboard_core={level}"))
    });

    let dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("postboard-tui.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file and environment, then flags on top.
fn board_config(cli: &Cli) -> Result<BoardConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(postboard_config::config_path);
    let mut cfg = postboard_config::load_config_from(&path)
        .wrap_err_with(|| format!("loading {}", path.display()))?;
    apply_overrides(&mut cfg, cli);
    postboard_config::to_board_config(&cfg)
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))
}

fn apply_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(ref url) = cli.posts_url {
        cfg.api.posts_url.clone_from(url);
    }
    if let Some(ref url) = cli.users_url {
        cfg.api.users_url.clone_from(url);
    }
    if cli.insecure {
        cfg.api.insecure = true;
    }
    if let Some(policy) = cli.policy {
        cfg.pagination.policy = PolicyPreset::from(policy).to_string();
        cfg.pagination.clamp_pages = None;
        cfg.pagination.total_pages = None;
        cfg.pagination.sort_scope = None;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = board_config(&cli)?;
    info!(
        posts = %config.posts_url,
        users = %config.users_url,
        limit = config.pagination.limit,
        "starting postboard-tui"
    );

    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
