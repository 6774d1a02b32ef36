//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders a page in the format selected by `--output`. Table uses `tabled`
//! plus a footer with the page indicator, structured formats serialize the
//! whole page (items and page info), plain emits one post per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use postboard_core::{EnrichedPost, PageInfo, PageView};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

const BODY_PREVIEW_CHARS: usize = 48;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Body")]
    body: String,
}

impl From<&EnrichedPost> for PostRow {
    fn from(p: &EnrichedPost) -> Self {
        let author = match &p.user {
            Some(user) => format!("{} <{}>", user.name, user.email),
            None => p.author_name().to_owned(),
        };
        Self {
            id: p.id,
            author,
            title: p.title.clone(),
            body: preview(&p.body),
        }
    }
}

/// First line of `text`, cut to a fixed width.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= BODY_PREVIEW_CHARS {
        return line.to_owned();
    }
    let mut cut: String = line.chars().take(BODY_PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a page in the chosen format.
pub fn render_page(format: OutputFormat, view: &PageView, color: bool) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<PostRow> = view.items.iter().map(PostRow::from).collect();
            let table = if rows.is_empty() {
                String::from("(no posts on this page)")
            } else {
                render_table(&rows)
            };
            Ok(format!("{table}\n{}", footer(&view.info, color)))
        }
        OutputFormat::Json => render_json(view, false),
        OutputFormat::JsonCompact => render_json(view, true),
        OutputFormat::Yaml => render_yaml(view),
        OutputFormat::Plain => Ok(view
            .items
            .iter()
            .map(|p| format!("{}\t{}", p.id, p.title))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Page indicator with prev/next markers dimmed when unavailable.
pub fn footer(info: &PageInfo, color: bool) -> String {
    let prev = "‹ prev";
    let next = "next ›";
    let (prev, next) = if color {
        (
            styled(prev, info.has_prev_page),
            styled(next, info.has_next_page),
        )
    } else {
        (
            if info.has_prev_page { prev.to_owned() } else { " ".repeat(6) },
            if info.has_next_page { next.to_owned() } else { String::new() },
        )
    };
    format!("{prev}  {info}  {next}").trim_end().to_owned()
}

fn styled(label: &str, enabled: bool) -> String {
    if enabled {
        label.cyan().bold().to_string()
    } else {
        label.dimmed().to_string()
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    out.map_err(|e| CliError::Internal(format!("JSON serialization failed: {e}")))
}

pub fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data)
        .map_err(|e| CliError::Internal(format!("YAML serialization failed: {e}")))
}
