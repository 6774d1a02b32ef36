//! UI actions. Every state change in the app goes through one of these.

use std::sync::Arc;

use postboard_core::{BoardEvent, BoardPhase, PageView, PaginationConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── App ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,

    // ── Board → UI ──
    /// A freshly rendered page from the board.
    PageRendered(Arc<PageView>),
    /// Pagination that produced the latest page.
    PaginationSynced(PaginationConfig),
    PhaseChanged(BoardPhase),
    LoadFailed(String),

    // ── UI → Board ──
    /// Emit a control event on the board's bus.
    Control(BoardEvent),

    Notify(Notification),
    DismissNotification,
}
