//! Config resolution for the CLI: file and environment via
//! `postboard-config`, then global flag overrides.

use std::path::PathBuf;

use postboard_config::{Config, to_board_config};
use postboard_core::{BoardConfig, PolicyPreset};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The config file in effect: `--config`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(postboard_config::config_path)
}

/// Load the config file and environment, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    let mut cfg = postboard_config::load_config_from(&path)
        .map_err(|e| CliError::from_config(e, &path))?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.posts_url {
        cfg.api.posts_url.clone_from(url);
    }
    if let Some(ref url) = global.users_url {
        cfg.api.users_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.api.timeout = timeout;
    }
    if global.insecure {
        cfg.api.insecure = true;
    }
    if let Some(policy) = global.policy {
        // A preset on the command line replaces any per-rule tweaks.
        cfg.pagination.policy = PolicyPreset::from(policy).to_string();
        cfg.pagination.clamp_pages = None;
        cfg.pagination.total_pages = None;
        cfg.pagination.sort_scope = None;
    }
}

/// Resolve and validate the board configuration.
pub fn board_config(global: &GlobalOpts) -> Result<BoardConfig, CliError> {
    let cfg = load(global)?;
    to_board_config(&cfg).map_err(|e| CliError::from_config(e, &config_path(global)))
}
