//! Clap derive structures for the `postboard` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use postboard_core::{BoardEvent, PolicyPreset};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// postboard -- page through posts and their authors
#[derive(Debug, Parser)]
#[command(
    name = "postboard",
    version,
    about = "Browse posts joined with their authors, one page at a time",
    long_about = "Fetches the posts and users collections from a JSON API, joins each\n\
        post with its author, and prints a sorted page of the result.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "POSTBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Posts collection URL (overrides config)
    #[arg(long, global = true)]
    pub posts_url: Option<String>,

    /// Users collection URL (overrides config)
    #[arg(long, global = true)]
    pub users_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Accept any TLS certificate
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Pagination rules (overrides config)
    #[arg(long, global = true)]
    pub policy: Option<PolicyArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "POSTBOARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table with a page footer (default)
    Table,
    /// Pretty-printed JSON page (items and page info)
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one post per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Unclamped pages, floor page count, per-page sorting
    Legacy,
    /// Clamped pages, ceiling page count, whole-collection sorting
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a page of posts with their authors
    #[command(alias = "p")]
    Posts(PostsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Posts ────────────────────────────────────────────────────────────

/// Controls are applied in order: page size, sort order, page, then
/// next and prev clicks.
#[derive(Debug, Args)]
pub struct PostsArgs {
    /// Page size
    #[arg(long, short = 'l')]
    pub limit: Option<String>,

    /// Sort order: "A-Z", "Z-A", "id ASC", "id DESC"
    #[arg(long)]
    pub order: Option<String>,

    /// Jump to page
    #[arg(long)]
    pub page: Option<String>,

    /// Click next N times
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub next: u32,

    /// Click prev N times
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub prev: u32,
}

impl PostsArgs {
    /// The control events these flags stand for, in emission order.
    pub fn events(&self) -> Vec<BoardEvent> {
        let dropdowns = [
            ("limit", &self.limit),
            ("orderBy", &self.order),
            ("page", &self.page),
        ];

        let mut events: Vec<BoardEvent> = dropdowns
            .into_iter()
            .filter_map(|(field, value)| {
                value
                    .as_ref()
                    .map(|value| BoardEvent::dropdown(field, value.as_str()))
            })
            .collect();

        events.extend((0..self.next).map(|_| BoardEvent::NextClick));
        events.extend((0..self.prev).map(|_| BoardEvent::PrevClick));
        events
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the effective configuration (file, env, and flags)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn posts_flags_become_events_in_order() {
        let cli = Cli::try_parse_from([
            "postboard", "posts", "--next", "2", "--order", "Z-A", "--limit", "5", "--prev", "1",
        ])
        .unwrap();
        let Command::Posts(args) = cli.command else {
            panic!("expected posts command");
        };

        assert_eq!(
            args.events(),
            [
                BoardEvent::dropdown("limit", "5"),
                BoardEvent::dropdown("orderBy", "Z-A"),
                BoardEvent::NextClick,
                BoardEvent::NextClick,
                BoardEvent::PrevClick,
            ]
        );
    }

    #[test]
    fn bare_posts_emits_nothing() {
        let cli = Cli::try_parse_from(["postboard", "posts"]).unwrap();
        let Command::Posts(args) = cli.command else {
            panic!("expected posts command");
        };
        assert!(args.events().is_empty());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli =
            Cli::try_parse_from(["postboard", "posts", "-o", "json", "--policy", "corrected"])
                .unwrap();
        assert_eq!(cli.global.output, OutputFormat::Json);
        assert_eq!(cli.global.policy, Some(PolicyArg::Corrected));
    }
}
