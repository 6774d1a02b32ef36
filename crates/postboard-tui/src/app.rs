//! Application core: event loop, action dispatch, and the chrome around
//! the posts screen (status bar, notifications, help overlay).

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use postboard_core::{Board, BoardConfig, BoardPhase};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::{channel_renderer, spawn_data_bridge};
use crate::event::{Event, EventReader};
use crate::screens::PostsScreen;
use crate::theme;
use crate::tui::Tui;

/// How long an info notification stays up. Errors stay until replaced.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

pub struct App {
    board: Board,
    posts: PostsScreen,
    running: bool,
    phase: BoardPhase,
    help_visible: bool,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Build the board with a renderer that feeds this app's action channel.
    pub fn new(config: BoardConfig) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let posts = PostsScreen::new(config.pagination);
        let board = Board::new(config, channel_renderer(action_tx.clone()))?;

        Ok(Self {
            board,
            posts,
            running: true,
            phase: BoardPhase::Uninitialized,
            help_visible: false,
            notification: None,
            action_tx,
            action_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let cancel = CancellationToken::new();
        tokio::spawn(spawn_data_bridge(
            self.board.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::new(Duration::from_millis(250), Duration::from_millis(33));
        info!(screen = self.posts.id(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the posts screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.posts.captures_escape() {
            return self.posts.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => Ok(Some(Action::ToggleHelp)),
            (_, KeyCode::Esc) if self.notification.is_some() => {
                Ok(Some(Action::DismissNotification))
            }
            _ => self.posts.handle_key_event(key),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.running = false;
            }
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Tick => self.expire_notification(),
            Action::Resize(w, h) => debug!(w, h, "terminal resized"),
            Action::Render => {}

            Action::Control(event) => {
                debug!(kind = %event.kind(), "emitting control event");
                match self.board.emit(event) {
                    Ok(()) => self
                        .action_tx
                        .send(Action::PaginationSynced(self.board.pagination()))?,
                    Err(e) => {
                        warn!(error = %e, "control event rejected");
                        self.action_tx
                            .send(Action::Notify(Notification::error(e.to_string())))?;
                    }
                }
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::DismissNotification => self.notification = None,

            Action::LoadFailed(reason) => {
                self.notification = Some((Notification::error(reason.clone()), Instant::now()));
                self.forward(action)?;
            }
            Action::PhaseChanged(phase) => {
                self.phase = *phase;
                if *phase == BoardPhase::Ready {
                    self.action_tx
                        .send(Action::Notify(Notification::info("Posts loaded")))?;
                }
                self.forward(action)?;
            }
            Action::PageRendered(_) | Action::PaginationSynced(_) => self.forward(action)?,
        }

        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.posts.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn expire_notification(&mut self) {
        let expired = self.notification.as_ref().is_some_and(|(n, shown)| {
            n.level != NotificationLevel::Error && shown.elapsed() >= NOTIFICATION_TTL
        });
        if expired {
            self.notification = None;
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // posts
            Constraint::Length(1), // status bar
        ])
        .split(area);

        self.posts.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let phase = match self.phase {
            BoardPhase::Ready => Span::styled("● ready", theme::phase_ready()),
            BoardPhase::Loading => Span::styled("◐ loading", theme::phase_loading()),
            BoardPhase::Uninitialized => Span::styled("○ idle", theme::key_hint()),
        };

        let source = self
            .board
            .config()
            .posts_url
            .host_str()
            .unwrap_or("local")
            .to_owned();

        let mut spans = vec![
            Span::raw(" "),
            phase,
            Span::styled(format!(" │ {source}"), theme::table_row()),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ];

        if let Some((notification, _)) = &self.notification {
            let style = match notification.level {
                NotificationLevel::Info => theme::phase_ready(),
                NotificationLevel::Error => theme::error(),
            };
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(Span::styled(notification.message.clone(), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 19u16.min(area.height.saturating_sub(2));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(help_width) / 2,
            area.y + area.height.saturating_sub(help_height) / 2,
            help_width,
            help_height,
        );

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(theme::popup_background());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    theme::heading(),
                )),
                Line::from(Span::styled(
                    format!("  {}", "─".repeat(title.chars().count())),
                    theme::key_hint(),
                )),
            ]
        };
        let entry = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };

        let mut lines = vec![Line::from("")];
        lines.extend(section("Table"));
        lines.push(entry("j/k ↑/↓", "Move up/down"));
        lines.push(entry("g/G", "First / last row"));
        lines.push(entry("Enter", "Post details"));
        lines.push(Line::from(""));
        lines.extend(section("Paging"));
        lines.push(entry("h/← n/→", "Previous / next page"));
        lines.push(entry("l", "Page size"));
        lines.push(entry("o", "Sort order"));
        lines.push(entry("p", "Jump to page"));
        lines.push(Line::from(""));
        lines.extend(section("Global"));
        lines.push(entry("Esc", "Close popup / dismiss message"));
        lines.push(entry("? / q", "This help / quit"));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
