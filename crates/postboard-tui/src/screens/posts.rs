//! Posts screen: control bar, the page table, pager, and a detail pane.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use postboard_core::{BoardEvent, BoardPhase, EnrichedPost, OrderBy, PageView, PaginationConfig};
use strum::IntoEnumIterator;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{Dropdown, DropdownOutcome};

const LIMIT_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Which dropdown in the control bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Limit,
    Order,
    Page,
}

impl Control {
    const ALL: [Self; 3] = [Self::Limit, Self::Order, Self::Page];

    fn hotkey(self) -> char {
        match self {
            Self::Limit => 'l',
            Self::Order => 'o',
            Self::Page => 'p',
        }
    }
}

pub struct PostsScreen {
    view: Arc<PageView>,
    phase: BoardPhase,
    load_error: Option<String>,
    table_state: TableState,
    detail_open: bool,
    limit: Dropdown,
    order: Dropdown,
    page: Dropdown,
}

impl PostsScreen {
    pub fn new(pagination: PaginationConfig) -> Self {
        let mut screen = Self {
            view: Arc::new(PageView::default()),
            phase: BoardPhase::Uninitialized,
            load_error: None,
            table_state: TableState::default(),
            detail_open: false,
            limit: Dropdown::new(
                "limit",
                "Limit",
                LIMIT_OPTIONS.iter().map(ToString::to_string).collect(),
            ),
            order: Dropdown::new(
                "orderBy",
                "Order",
                OrderBy::iter().map(|o| o.label().to_owned()).collect(),
            ),
            page: Dropdown::new("page", "Page", Vec::new()),
        };
        screen.sync_pagination(pagination);
        screen
    }

    fn dropdown(&self, control: Control) -> &Dropdown {
        match control {
            Control::Limit => &self.limit,
            Control::Order => &self.order,
            Control::Page => &self.page,
        }
    }

    fn dropdown_mut(&mut self, control: Control) -> &mut Dropdown {
        match control {
            Control::Limit => &mut self.limit,
            Control::Order => &mut self.order,
            Control::Page => &mut self.page,
        }
    }

    fn open_control(&self) -> Option<Control> {
        Control::ALL
            .into_iter()
            .find(|&c| self.dropdown(c).is_open())
    }

    /// Open one dropdown; at most one is open at a time.
    fn toggle_control(&mut self, control: Control) {
        let was_open = self.dropdown(control).is_open();
        for other in Control::ALL {
            self.dropdown_mut(other).close();
        }
        if !was_open {
            self.dropdown_mut(control).open();
        }
    }

    fn sync_pagination(&mut self, pagination: PaginationConfig) {
        let limit = pagination.limit.to_string();
        if !self.limit.options().contains(&limit) {
            // A configured size outside the presets still gets a row.
            let mut sizes: Vec<usize> = LIMIT_OPTIONS.to_vec();
            sizes.push(pagination.limit);
            sizes.sort_unstable();
            self.limit
                .set_options(sizes.iter().map(ToString::to_string).collect());
        }
        self.limit.select_value(&limit);
        self.order.select_value(pagination.order_by.label());
    }

    fn set_view(&mut self, view: &Arc<PageView>) {
        self.view = Arc::clone(view);

        let pages = (1..=self.view.info.total_pages)
            .map(|p| p.to_string())
            .collect();
        self.page.set_options(pages);
        self.page
            .select_value(&self.view.info.current_page.to_string());

        let len = self.view.items.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn selected_post(&self) -> Option<&EnrichedPost> {
        self.table_state
            .selected()
            .and_then(|i| self.view.items.get(i))
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.view.items.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn pager_click(&self, event: BoardEvent) -> Option<Action> {
        let info = &self.view.info;
        let enabled = match event {
            BoardEvent::PrevClick => info.has_prev_page,
            BoardEvent::NextClick => info.has_next_page,
            BoardEvent::DropdownChange(_) => true,
        };
        enabled.then_some(Action::Control(event))
    }

    // ── Rendering ─────────────────────────────────────────────────────

    fn render_controls(&self, frame: &mut Frame, area: Rect) -> Vec<(Control, Rect)> {
        let mut spans = vec![Span::raw(" ")];
        let mut anchors = Vec::new();
        let mut x = area.x + 1;
        for control in Control::ALL {
            let dropdown = self.dropdown(control);
            let width = dropdown.button_width(control.hotkey());
            anchors.push((control, Rect::new(x, area.y, width, 1)));
            spans.extend(dropdown.button(control.hotkey()));
            spans.push(Span::raw("    "));
            x = x.saturating_add(width + 4);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        anchors
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from("ID").style(theme::table_header()),
            Cell::from("Author").style(theme::table_header()),
            Cell::from("Title").style(theme::table_header()),
            Cell::from("Body").style(theme::table_header()),
        ]);

        let selected_idx = self.table_state.selected();
        let rows: Vec<Row> = self
            .view
            .items
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let is_selected = Some(i) == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let author = match &post.user {
                    Some(user) => format!("{} <{}>", user.name, user.email),
                    None => post.author_name().to_owned(),
                };
                let body = post.body.lines().next().unwrap_or_default().to_owned();

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", post.id)),
                    Cell::from(author).style(theme::author()),
                    Cell::from(post.title.clone()).style(theme::post_title(is_selected)),
                    Cell::from(body),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Min(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        // Rendering moves the scroll offset; the screen's state stays put.
        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            "Loading posts and authors…",
            theme::loading(),
        ))];
        if let Some(err) = &self.load_error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Could not load: {err}"),
                theme::error(),
            )));
        }
        let top = area.height.saturating_sub(3) / 2;
        let area = Rect {
            y: area.y + top,
            height: area.height.saturating_sub(top),
            ..area
        };
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_pager(&self, frame: &mut Frame, area: Rect) {
        let info = &self.view.info;
        let style = |enabled: bool| {
            if enabled {
                theme::control_enabled()
            } else {
                theme::control_disabled()
            }
        };
        let line = Line::from(vec![
            Span::styled("‹ prev", style(info.has_prev_page)),
            Span::raw("   "),
            Span::styled(info.to_string(), theme::table_row()),
            Span::raw("   "),
            Span::styled("next ›", style(info.has_next_page)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_detail(frame: &mut Frame, area: Rect, post: &EnrichedPost) {
        let block = Block::default()
            .title(format!(" Post #{} ", post.id))
            .title_style(theme::title_style())
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(Span::styled(
                post.title.clone(),
                theme::post_title(true),
            )),
            Line::from(vec![
                Span::styled("by ", theme::key_hint()),
                Span::styled(post.author_name().to_owned(), theme::author()),
                Span::styled(
                    if post.author_email().is_empty() {
                        String::new()
                    } else {
                        format!(" <{}>", post.author_email())
                    },
                    theme::table_row(),
                ),
            ]),
        ];

        if let Some(user) = &post.user {
            let fields = [
                ("username", user.username.as_deref()),
                ("phone", user.phone.as_deref()),
                ("website", user.website.as_deref()),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{label:<9}"), theme::key_hint()),
                        Span::styled(value.to_owned(), theme::table_row()),
                    ]));
                }
            }
        }

        lines.push(Line::from(""));
        lines.extend(
            post.body
                .lines()
                .map(|l| Line::from(Span::styled(l.to_owned(), theme::table_row()))),
        );

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn hints(&self) -> Line<'static> {
        let pairs: &[(&str, &str)] = if self.open_control().is_some() {
            &[("  j/k ", "choose  "), ("Enter ", "apply  "), ("Esc ", "cancel")]
        } else {
            &[
                ("  j/k ", "navigate  "),
                ("←/→ ", "prev/next  "),
                ("l/o/p ", "limit/order/page  "),
                ("Enter ", "details"),
            ]
        };
        Line::from(
            pairs
                .iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(*key, theme::key_hint_key()),
                        Span::styled(*label, theme::key_hint()),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    }
}

impl Component for PostsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(control) = self.open_control() {
            let dropdown = self.dropdown_mut(control);
            return Ok(match dropdown.handle_key(key) {
                DropdownOutcome::Selected(value) => Some(Action::Control(BoardEvent::dropdown(
                    dropdown.field(),
                    value,
                ))),
                DropdownOutcome::Ignored
                | DropdownOutcome::Consumed
                | DropdownOutcome::Dismissed => None,
            });
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Up | KeyCode::Char('k')) => self.move_selection(-1),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.move_selection(1),
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                if !self.view.items.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            (_, KeyCode::Char('G') | KeyCode::End) => {
                self.move_selection(isize::MAX);
            }
            (_, KeyCode::Enter) if self.selected_post().is_some() => {
                self.detail_open = !self.detail_open;
            }
            (_, KeyCode::Esc) if self.detail_open => self.detail_open = false,

            // Controls do nothing until the board has data.
            _ if self.phase != BoardPhase::Ready => {}

            (_, KeyCode::Left | KeyCode::Char('h')) => {
                return Ok(self.pager_click(BoardEvent::PrevClick));
            }
            (_, KeyCode::Right | KeyCode::Char('n')) => {
                return Ok(self.pager_click(BoardEvent::NextClick));
            }
            (KeyModifiers::NONE, KeyCode::Char(c)) => {
                if let Some(control) = Control::ALL.into_iter().find(|ctl| ctl.hotkey() == c) {
                    self.toggle_control(control);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::PageRendered(view) => self.set_view(view),
            Action::PaginationSynced(pagination) => self.sync_pagination(*pagination),
            Action::PhaseChanged(phase) => self.phase = *phase,
            Action::LoadFailed(reason) => self.load_error = Some(reason.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Posts ({}) ", self.view.info.total_items);
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.open_control().is_some() {
                theme::border_default()
            } else {
                theme::border_focused()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // controls
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // table (+ detail)
            Constraint::Length(1), // pager
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let anchors = self.render_controls(frame, layout[0]);

        if self.phase == BoardPhase::Ready {
            let (table_area, detail_area) = if self.detail_open {
                let chunks =
                    Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .split(layout[2]);
                (chunks[0], Some(chunks[1]))
            } else {
                (layout[2], None)
            };

            self.render_table(frame, table_area);

            if let (Some(detail_area), Some(post)) = (detail_area, self.selected_post()) {
                Self::render_detail(frame, detail_area, post);
            }
            self.render_pager(frame, layout[3]);
        } else {
            self.render_loading(frame, layout[2]);
        }

        frame.render_widget(Paragraph::new(self.hints()), layout[4]);

        if let Some(control) = self.open_control() {
            if let Some((_, anchor)) = anchors.iter().find(|(c, _)| *c == control) {
                self.dropdown(control).render_popup(frame, *anchor, area);
            }
        }
    }

    fn captures_escape(&self) -> bool {
        self.detail_open || self.open_control().is_some()
    }

    fn id(&self) -> &str {
        "Posts"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use postboard_core::{PageInfo, User};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn post(id: u64, user: Option<User>) -> EnrichedPost {
        EnrichedPost {
            id,
            title: format!("title {id}"),
            body: format!("body of {id}\nsecond line"),
            user,
        }
    }

    fn leanne() -> User {
        User {
            id: 1,
            name: "Leanne Graham".into(),
            email: "Sincere@april.biz".into(),
            username: Some("Bret".into()),
            phone: None,
            website: Some("hildegard.org".into()),
            extra: serde_json::Map::new(),
        }
    }

    fn first_page() -> Arc<PageView> {
        Arc::new(PageView {
            items: vec![post(1, Some(leanne())), post(2, None), post(3, None)],
            info: PageInfo {
                current_page: 1,
                total_pages: 3,
                total_items: 25,
                has_prev_page: false,
                has_next_page: true,
            },
        })
    }

    fn ready_screen() -> PostsScreen {
        let mut screen = PostsScreen::new(PaginationConfig::default());
        screen
            .update(&Action::PhaseChanged(BoardPhase::Ready))
            .unwrap();
        screen.update(&Action::PageRendered(first_page())).unwrap();
        screen
    }

    fn screen_text(screen: &PostsScreen, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn pager_keys_respect_availability() {
        let mut screen = ready_screen();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Right)).unwrap(),
            Some(Action::Control(BoardEvent::NextClick))
        );
        assert_eq!(screen.handle_key_event(key(KeyCode::Left)).unwrap(), None);
    }

    #[test]
    fn controls_are_inert_while_loading() {
        let mut screen = PostsScreen::new(PaginationConfig::default());
        screen
            .update(&Action::PhaseChanged(BoardPhase::Loading))
            .unwrap();
        assert_eq!(screen.handle_key_event(key(KeyCode::Right)).unwrap(), None);
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        assert!(screen.open_control().is_none());
    }

    #[test]
    fn limit_dropdown_emits_dropdown_change() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        assert_eq!(screen.open_control(), Some(Control::Limit));
        assert!(screen.captures_escape());

        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::Control(BoardEvent::dropdown("limit", "20")))
        );
        assert!(screen.open_control().is_none());
    }

    #[test]
    fn order_dropdown_uses_sort_labels() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('o'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('g'))).unwrap();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Control(BoardEvent::dropdown("orderBy", "Z-A")))
        );
    }

    #[test]
    fn opening_one_dropdown_closes_the_other() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(screen.open_control().is_none());

        screen.toggle_control(Control::Limit);
        screen.toggle_control(Control::Page);
        assert_eq!(screen.open_control(), Some(Control::Page));
        assert!(!screen.limit.is_open());
    }

    #[test]
    fn page_dropdown_lists_every_page() {
        let mut screen = ready_screen();
        assert_eq!(screen.page.options(), ["1", "2", "3"]);
        assert_eq!(screen.page.value(), Some("1"));

        screen.handle_key_event(key(KeyCode::Char('p'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Control(BoardEvent::dropdown("page", "3")))
        );
    }

    #[test]
    fn configured_limit_outside_presets_is_listed() {
        let screen = PostsScreen::new(PaginationConfig {
            limit: 25,
            ..PaginationConfig::default()
        });
        assert_eq!(screen.limit.options(), ["5", "10", "20", "25", "50"]);
        assert_eq!(screen.limit.value(), Some("25"));
    }

    #[test]
    fn selection_is_clamped_to_a_shorter_page() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(screen.table_state.selected(), Some(2));

        let shorter = Arc::new(PageView {
            items: vec![post(4, None)],
            info: PageInfo {
                current_page: 2,
                total_pages: 2,
                total_items: 4,
                has_prev_page: true,
                has_next_page: false,
            },
        });
        screen.update(&Action::PageRendered(shorter)).unwrap();
        assert_eq!(screen.table_state.selected(), Some(0));

        screen
            .update(&Action::PageRendered(Arc::new(PageView::default())))
            .unwrap();
        assert_eq!(screen.table_state.selected(), None);
        assert!(screen.selected_post().is_none());
    }

    #[test]
    fn enter_toggles_detail_and_escape_closes_it() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(screen.detail_open);
        assert!(screen.captures_escape());
        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!screen.detail_open);
    }

    #[test]
    fn renders_rows_and_page_indicator() {
        let screen = ready_screen();
        let text = screen_text(&screen, 120, 16);
        assert!(text.contains("Leanne Graham <Sincere@april.biz>"));
        assert!(text.contains("unknown author"));
        assert!(text.contains("body of 2"));
        assert!(text.contains("Page 1 of 3 (25 items)"));
        assert!(text.contains("Limit: 10"));
        assert!(text.contains("Order: id ASC"));
    }

    #[test]
    fn renders_loading_line_and_failure() {
        let mut screen = PostsScreen::new(PaginationConfig::default());
        screen
            .update(&Action::PhaseChanged(BoardPhase::Loading))
            .unwrap();
        screen
            .update(&Action::LoadFailed("HTTP 503".into()))
            .unwrap();
        let text = screen_text(&screen, 80, 14);
        assert!(text.contains("Loading posts and authors"));
        assert!(text.contains("Could not load: HTTP 503"));
        assert!(!text.contains("Page 1 of"));
    }
}
