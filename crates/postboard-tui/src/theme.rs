//! Colors and semantic styles. Screens ask for a role (`author()`,
//! `control_disabled()`), never for a raw color.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

const ACCENT: Color = Color::Rgb(255, 158, 100); // #ff9e64
const HEADLINE: Color = Color::Rgb(125, 207, 255); // #7dcfff
const BYLINE: Color = Color::Rgb(187, 154, 247); // #bb9af7
const PENDING: Color = Color::Rgb(224, 175, 104); // #e0af68
const GOOD: Color = Color::Rgb(158, 206, 106); // #9ece6a
const BAD: Color = Color::Rgb(247, 118, 142); // #f7768e

const TEXT: Color = Color::Rgb(192, 202, 245); // #c0caf5
const MUTED: Color = Color::Rgb(86, 95, 137); // #565f89
const BG_SELECTED: Color = Color::Rgb(41, 46, 66); // #292e42
const BG_POPUP: Color = Color::Rgb(26, 27, 38); // #1a1b26

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

// ── Chrome ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    bold(HEADLINE)
}

pub fn border_focused() -> Style {
    fg(ACCENT)
}

pub fn border_default() -> Style {
    fg(MUTED)
}

pub fn key_hint() -> Style {
    fg(MUTED)
}

pub fn key_hint_key() -> Style {
    bold(HEADLINE)
}

pub fn popup_background() -> Style {
    Style::default().bg(BG_POPUP)
}

// ── Table ─────────────────────────────────────────────────────────────

pub fn table_header() -> Style {
    bold(HEADLINE).add_modifier(Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    fg(TEXT)
}

pub fn table_selected() -> Style {
    bold(ACCENT).bg(BG_SELECTED)
}

pub fn post_title(selected: bool) -> Style {
    if selected { bold(HEADLINE) } else { fg(HEADLINE) }
}

pub fn author() -> Style {
    fg(BYLINE)
}

// ── Controls ──────────────────────────────────────────────────────────

/// A pager control that can be used right now.
pub fn control_enabled() -> Style {
    bold(HEADLINE)
}

/// A pager control with nowhere to go.
pub fn control_disabled() -> Style {
    fg(MUTED).add_modifier(Modifier::DIM)
}

pub fn dropdown_button(open: bool) -> Style {
    if open { bold(ACCENT) } else { fg(TEXT) }
}

/// Marker next to the option currently in effect.
pub fn dropdown_current() -> Style {
    fg(GOOD)
}

// ── Status ────────────────────────────────────────────────────────────

pub fn loading() -> Style {
    fg(PENDING).add_modifier(Modifier::ITALIC)
}

pub fn phase_ready() -> Style {
    fg(GOOD)
}

pub fn phase_loading() -> Style {
    fg(PENDING)
}

pub fn error() -> Style {
    fg(BAD)
}

/// Section heading inside an overlay.
pub fn heading() -> Style {
    fg(HEADLINE)
}
