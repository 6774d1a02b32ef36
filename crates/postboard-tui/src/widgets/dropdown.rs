//! A single-choice dropdown bound to one pagination field.
//!
//! Closed, it draws as a one-line button (`Limit: 10 ▾`). Open, it draws a
//! bordered list under its anchor and owns the arrow keys until a choice
//! is made or it is dismissed.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
};

use crate::theme;

/// What a key press did to an open dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownOutcome {
    /// The dropdown was closed; the key belongs to someone else.
    Ignored,
    /// Cursor moved or similar; nothing to dispatch.
    Consumed,
    /// An option was chosen. Carries the option's raw value.
    Selected(String),
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct Dropdown {
    field: &'static str,
    label: &'static str,
    options: Vec<String>,
    /// Index of the value currently in effect.
    current: Option<usize>,
    /// Highlighted row while open.
    cursor: usize,
    open: bool,
}

impl Dropdown {
    pub fn new(field: &'static str, label: &'static str, options: Vec<String>) -> Self {
        Self {
            field,
            label,
            options,
            current: None,
            cursor: 0,
            open: false,
        }
    }

    /// The pagination field this dropdown drives (`limit`, `orderBy`, `page`).
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn set_options(&mut self, options: Vec<String>) {
        let current = self.value().map(str::to_owned);
        self.options = options;
        self.current = None;
        if let Some(value) = current {
            self.select_value(&value);
        }
        self.cursor = self.cursor.min(self.options.len().saturating_sub(1));
    }

    /// Mark `value` as the one in effect. Unknown values leave no mark.
    pub fn select_value(&mut self, value: &str) {
        self.current = self.options.iter().position(|o| o == value);
    }

    pub fn value(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open with the cursor on the current value.
    pub fn open(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.cursor = self.current.unwrap_or(0);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DropdownOutcome {
        if !self.open {
            return DropdownOutcome::Ignored;
        }
        let last = self.options.len().saturating_sub(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                DropdownOutcome::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(last);
                DropdownOutcome::Consumed
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor = 0;
                DropdownOutcome::Consumed
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = last;
                DropdownOutcome::Consumed
            }
            KeyCode::Enter => {
                self.open = false;
                match self.options.get(self.cursor) {
                    Some(value) => {
                        self.current = Some(self.cursor);
                        DropdownOutcome::Selected(value.clone())
                    }
                    None => DropdownOutcome::Dismissed,
                }
            }
            KeyCode::Esc => {
                self.open = false;
                DropdownOutcome::Dismissed
            }
            // Swallow everything else so stray keys don't reach the table.
            _ => DropdownOutcome::Consumed,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────

    /// The closed button as spans, e.g. `l Limit: 10 ▾`.
    pub fn button(&self, hotkey: char) -> Vec<Span<'static>> {
        let value = self.value().unwrap_or("─").to_owned();
        let arrow = if self.open { " ▴" } else { " ▾" };
        vec![
            Span::styled(format!("{hotkey} "), theme::key_hint_key()),
            Span::styled(format!("{}: ", self.label), theme::key_hint()),
            Span::styled(format!("{value}{arrow}"), theme::dropdown_button(self.open)),
        ]
    }

    /// Width of [`Dropdown::button`] in cells.
    pub fn button_width(&self, hotkey: char) -> u16 {
        let width: usize = self
            .button(hotkey)
            .iter()
            .map(|span| span.content.chars().count())
            .sum();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// Draw the open list below `anchor`, clipped to `bounds`.
    pub fn render_popup(&self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        if !self.open {
            return;
        }
        let widest = self
            .options
            .iter()
            .map(|o| o.chars().count())
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 6)
            .unwrap_or(u16::MAX)
            .max(anchor.width)
            .min(bounds.width);
        let height = u16::try_from(self.options.len() + 2)
            .unwrap_or(u16::MAX)
            .min(bounds.bottom().saturating_sub(anchor.bottom()));
        if width == 0 || height < 3 {
            return;
        }
        let x = anchor.x.min(bounds.right().saturating_sub(width));
        let area = Rect::new(x, anchor.bottom(), width, height);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let marker = if Some(i) == self.current { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, theme::dropdown_current()),
                    Span::raw(option.clone()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", self.label))
                    .title_style(theme::title_style())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_focused())
                    .style(theme::popup_background()),
            )
            .style(theme::table_row())
            .highlight_style(theme::table_selected());

        let mut state = ListState::default().with_selected(Some(self.cursor));
        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn limits() -> Dropdown {
        let mut dd = Dropdown::new(
            "limit",
            "Limit",
            ["5", "10", "20", "50"].map(String::from).to_vec(),
        );
        dd.select_value("10");
        dd
    }

    #[test]
    fn closed_dropdown_ignores_keys() {
        let mut dd = limits();
        assert_eq!(dd.handle_key(key(KeyCode::Down)), DropdownOutcome::Ignored);
        assert_eq!(dd.handle_key(key(KeyCode::Enter)), DropdownOutcome::Ignored);
        assert_eq!(dd.value(), Some("10"));
    }

    #[test]
    fn open_starts_on_current_value() {
        let mut dd = limits();
        dd.open();
        assert!(dd.is_open());
        assert_eq!(
            dd.handle_key(key(KeyCode::Enter)),
            DropdownOutcome::Selected("10".into())
        );
        assert!(!dd.is_open());
    }

    #[test]
    fn cursor_moves_and_stops_at_edges() {
        let mut dd = limits();
        dd.open();
        for _ in 0..10 {
            dd.handle_key(key(KeyCode::Down));
        }
        assert_eq!(
            dd.handle_key(key(KeyCode::Enter)),
            DropdownOutcome::Selected("50".into())
        );
        assert_eq!(dd.value(), Some("50"));

        dd.open();
        dd.handle_key(key(KeyCode::Char('g')));
        dd.handle_key(key(KeyCode::Up));
        assert_eq!(
            dd.handle_key(key(KeyCode::Enter)),
            DropdownOutcome::Selected("5".into())
        );
    }

    #[test]
    fn escape_dismisses_without_changing_value() {
        let mut dd = limits();
        dd.open();
        dd.handle_key(key(KeyCode::Down));
        assert_eq!(dd.handle_key(key(KeyCode::Esc)), DropdownOutcome::Dismissed);
        assert_eq!(dd.value(), Some("10"));
    }

    #[test]
    fn open_swallows_unrelated_keys() {
        let mut dd = limits();
        dd.open();
        assert_eq!(
            dd.handle_key(key(KeyCode::Char('q'))),
            DropdownOutcome::Consumed
        );
        assert!(dd.is_open());
    }

    #[test]
    fn replacing_options_keeps_current_value_when_present() {
        let mut dd = Dropdown::new("page", "Page", ["1", "2", "3"].map(String::from).to_vec());
        dd.select_value("2");
        dd.set_options(["1", "2"].map(String::from).to_vec());
        assert_eq!(dd.value(), Some("2"));
        dd.set_options(vec!["1".into()]);
        assert_eq!(dd.value(), None);
    }

    #[test]
    fn empty_dropdown_does_not_open() {
        let mut dd = Dropdown::new("page", "Page", Vec::new());
        dd.open();
        assert!(!dd.is_open());
    }

    #[test]
    fn button_shows_label_and_value() {
        let dd = limits();
        let text: String = dd.button('l').iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "l Limit: 10 ▾");
        assert_eq!(dd.button_width('l'), 13);
    }
}
