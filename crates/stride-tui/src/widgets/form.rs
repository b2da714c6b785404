//! Field-by-field text entry form used by the edit screens.
//!
//! Holds labelled string inputs with one focused field; the owning
//! screen parses values on submit and renders the fields itself.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme;

/// One labelled text input.
#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

/// A vertical stack of text fields with a focus cursor.
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
    active: usize,
    /// Validation message shown under the fields.
    pub error: Option<String>,
}

impl Form {
    pub fn new(labels: &[&'static str]) -> Self {
        Self {
            fields: labels
                .iter()
                .map(|&label| Field {
                    label,
                    value: String::new(),
                })
                .collect(),
            active: 0,
            error: None,
        }
    }

    /// Pre-fill a field by label. Unknown labels are ignored.
    pub fn set(&mut self, label: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.label == label) {
            field.value = value.into();
        }
    }

    /// Trimmed value of a field, `None` when empty or unknown.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn focus_next(&mut self) {
        self.active = (self.active + 1) % self.fields.len().max(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields.len().max(1);
        self.active = (self.active + len - 1) % len;
    }

    /// Apply a key to the focused field. Returns true if consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                true
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.active) {
                    field.value.pop();
                }
                self.error = None;
                true
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.fields.get_mut(self.active) {
                    field.value.push(c);
                }
                self.error = None;
                true
            }
            _ => false,
        }
    }

    /// Height needed to render every field plus the error line.
    pub fn height(&self) -> u16 {
        u16::try_from(self.fields.len()).unwrap_or(u16::MAX) * 4 + 1
    }

    /// Render the field stack top-down from `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut y = area.y;
        for (i, field) in self.fields.iter().enumerate() {
            if y + 4 > area.y + area.height {
                break;
            }
            let active = i == self.active;

            let label_style = if active {
                Style::default().fg(theme::SKY_CYAN)
            } else {
                Style::default().fg(theme::DIM_WHITE)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", field.label), label_style)),
                Rect::new(area.x, y, area.width, 1),
            );

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if active {
                    theme::border_focused()
                } else {
                    theme::border_default()
                });
            let block_area = Rect::new(area.x, y + 1, area.width, 3);
            let inner = block.inner(block_area);
            frame.render_widget(block, block_area);

            let text = if active {
                format!("{}\u{2588}", field.value)
            } else {
                field.value.clone()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(theme::SKY_CYAN))),
                inner,
            );

            y += 4;
        }

        if let Some(ref err) = self.error {
            if y < area.y + area.height {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!("  {err}"), theme::error_style())),
                    Rect::new(area.x, y, area.width, 1),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut form = Form::new(&["Login", "Email"]);
        for c in "amara".chars() {
            assert!(form.handle_key(key(KeyCode::Char(c))));
        }
        assert_eq!(form.get("Login"), Some("amara"));
        assert_eq!(form.get("Email"), None);

        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.get("Login"), Some("amar"));
    }

    #[test]
    fn tab_cycles_focus() {
        let mut form = Form::new(&["A", "B", "C"]);
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('x')));
        assert_eq!(form.get("B"), Some("x"));

        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('y')));
        assert_eq!(form.get("A"), Some("y"));

        form.handle_key(key(KeyCode::BackTab));
        form.handle_key(key(KeyCode::Char('z')));
        assert_eq!(form.get("C"), Some("z"));
    }

    #[test]
    fn get_trims_and_treats_blank_as_none() {
        let mut form = Form::new(&["Name"]);
        form.set("Name", "  padded  ");
        assert_eq!(form.get("Name"), Some("padded"));

        form.set("Name", "   ");
        assert_eq!(form.get("Name"), None);
    }

    #[test]
    fn typing_clears_validation_error() {
        let mut form = Form::new(&["Name"]);
        form.error = Some("required".into());
        form.handle_key(key(KeyCode::Char('a')));
        assert_eq!(form.error, None);
    }
}
