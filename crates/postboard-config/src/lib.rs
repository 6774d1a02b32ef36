//! Shared configuration for the postboard CLI and TUI.
//!
//! A TOML file with `[api]` and `[pagination]` sections, layered under
//! `POSTBOARD_*` environment variables, and translated into
//! `postboard_core::BoardConfig`. Both binaries depend on this crate and
//! apply their own flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use postboard_api::TlsMode;
use postboard_core::{
    BoardConfig, DEFAULT_LIMIT, DEFAULT_POSTS_URL, DEFAULT_USERS_URL, OrderBy, PagePolicy,
    PaginationConfig, PolicyPreset, SortScope, TotalPagesRounding,
};

const ENV_PREFIX: &str = "POSTBOARD_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file already exists at {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub pagination: PaginationSection,
}

/// Where the collections live and how to reach them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSection {
    #[serde(default = "default_posts_url")]
    pub posts_url: String,

    #[serde(default = "default_users_url")]
    pub users_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept any TLS certificate.
    #[serde(default)]
    pub insecure: bool,

    /// Extra CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            posts_url: default_posts_url(),
            users_url: default_users_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

/// Initial page size and order, plus the pagination rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaginationSection {
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// One of "A-Z", "Z-A", "id ASC", "id DESC".
    #[serde(default = "default_order_by")]
    pub order_by: String,

    /// "legacy" or "corrected".
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Per-rule overrides of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp_pages: Option<bool>,

    /// "floor" or "ceil".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<String>,

    /// "page" or "collection".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_scope: Option<String>,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            order_by: default_order_by(),
            policy: default_policy(),
            clamp_pages: None,
            total_pages: None,
            sort_scope: None,
        }
    }
}

fn default_posts_url() -> String {
    DEFAULT_POSTS_URL.into()
}
fn default_users_url() -> String {
    DEFAULT_USERS_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_order_by() -> String {
    OrderBy::default().label().into()
}
fn default_policy() -> String {
    PolicyPreset::default().to_string()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "postboard", "postboard").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("postboard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `POSTBOARD_*` variables
/// (`POSTBOARD_API__TIMEOUT=5` sets `api.timeout`).
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is not
/// an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_toml(cfg)?)?;
    Ok(())
}

/// Write a default config to `path`. Refuses to overwrite unless `force`.
pub fn init_config(path: &Path, force: bool) -> Result<Config, ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let cfg = Config::default();
    save_config_to(&cfg, path)?;
    Ok(cfg)
}

pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Translation to BoardConfig ──────────────────────────────────────

impl PaginationSection {
    /// Resolve the preset and apply any per-rule overrides.
    pub fn page_policy(&self) -> Result<PagePolicy, ConfigError> {
        let preset: PolicyPreset = self.policy.parse().map_err(|_| {
            invalid(
                "pagination.policy",
                format!("expected 'legacy' or 'corrected', got '{}'", self.policy),
            )
        })?;
        let mut policy = PagePolicy::from_preset(preset);

        if let Some(clamp) = self.clamp_pages {
            policy.clamp_pages = clamp;
        }
        if let Some(ref rounding) = self.total_pages {
            policy.total_pages = rounding.parse::<TotalPagesRounding>().map_err(|_| {
                invalid(
                    "pagination.total_pages",
                    format!("expected 'floor' or 'ceil', got '{rounding}'"),
                )
            })?;
        }
        if let Some(ref scope) = self.sort_scope {
            policy.sort_scope = scope.parse::<SortScope>().map_err(|_| {
                invalid(
                    "pagination.sort_scope",
                    format!("expected 'page' or 'collection', got '{scope}'"),
                )
            })?;
        }
        Ok(policy)
    }

    pub fn order(&self) -> Result<OrderBy, ConfigError> {
        self.order_by.parse().map_err(|_| {
            invalid(
                "pagination.order_by",
                format!(
                    "expected one of 'A-Z', 'Z-A', 'id ASC', 'id DESC', got '{}'",
                    self.order_by
                ),
            )
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw
        .parse()
        .map_err(|e| invalid(field, format!("invalid URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

/// Validate `cfg` and build the board configuration from it.
pub fn to_board_config(cfg: &Config) -> Result<BoardConfig, ConfigError> {
    let posts_url = parse_url("api.posts_url", &cfg.api.posts_url)?;
    let users_url = parse_url("api.users_url", &cfg.api.users_url)?;

    if cfg.api.timeout == 0 {
        return Err(invalid("api.timeout", "must be at least 1 second"));
    }
    if cfg.pagination.limit == 0 {
        return Err(invalid("pagination.limit", "must be a positive integer"));
    }

    let tls = if cfg.api.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca) = cfg.api.ca_cert {
        TlsMode::CustomCa(ca.clone())
    } else {
        TlsMode::System
    };

    Ok(BoardConfig {
        posts_url,
        users_url,
        timeout: Duration::from_secs(cfg.api.timeout),
        tls,
        pagination: PaginationConfig {
            limit: cfg.pagination.limit,
            page: 1,
            order_by: cfg.pagination.order()?,
        },
        policy: cfg.pagination.page_policy()?,
    })
}
