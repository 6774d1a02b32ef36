//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use postboard_config::ConfigError;
use postboard_core::{CoreError, Resource};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const FETCH: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetch ────────────────────────────────────────────────────────
    #[error("Could not fetch {resource}: {reason}")]
    #[diagnostic(
        code(postboard::fetch_failed),
        help(
            "Check that the endpoint is reachable and returns a JSON array.\n\
             Override it with --posts-url / --users-url, or inspect: postboard config show"
        )
    )]
    Fetch { resource: Resource, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value '{value}' for {field}: {reason}")]
    #[diagnostic(code(postboard::invalid_control))]
    InvalidControl {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(postboard::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration: {field}: {reason}")]
    #[diagnostic(
        code(postboard::invalid_config),
        help("Fix the value in {path}, or regenerate it with: postboard config init --force")
    )]
    InvalidConfig {
        field: String,
        reason: String,
        path: String,
    },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(postboard::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(postboard::config))]
    Config(Box<ConfigError>),

    // ── Other ────────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(postboard::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch { .. } => exit_code::FETCH,
            Self::InvalidControl { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::InvalidConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::ConfigExists { .. } | Self::Internal(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Attach the config file path to a configuration error.
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::InvalidConfig {
                field,
                reason,
                path: path.display().to_string(),
            },
            ConfigError::AlreadyExists { path } => Self::ConfigExists {
                path: path.display().to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch {
                resource, reason, ..
            } => CliError::Fetch { resource, reason },

            CoreError::InvalidControl {
                field,
                value,
                reason,
            } => CliError::InvalidControl {
                field,
                value,
                reason,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "transport".into(),
                reason: message,
            },

            other @ (CoreError::AlreadyStarted | CoreError::Internal(_)) => {
                CliError::Internal(other.to_string())
            }
        }
    }
}
