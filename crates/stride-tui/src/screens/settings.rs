//! Settings screen — view and edit the signed-in administrator's profile.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use stride_core::{Account, AccountState};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::form::Form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    View,
    Edit,
}

pub struct SettingsScreen {
    focused: bool,
    state: AccountState,
    mode: Mode,
    form: Form,
    error_dismissed: bool,
    saved_flash: bool,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: AccountState::default(),
            mode: Mode::View,
            form: Form::new(&["First name", "Last name", "Email", "Language"]),
            error_dismissed: false,
            saved_flash: false,
        }
    }

    fn populate_form(&mut self, account: &Account) {
        self.form
            .set("First name", account.first_name.clone().unwrap_or_default());
        self.form
            .set("Last name", account.last_name.clone().unwrap_or_default());
        self.form
            .set("Email", account.email.clone().unwrap_or_default());
        self.form
            .set("Language", account.lang_key.clone().unwrap_or_default());
    }

    fn enter_edit(&mut self) {
        let Some(account) = self.state.account.clone() else {
            return;
        };
        self.form = Form::new(&["First name", "Last name", "Email", "Language"]);
        self.populate_form(&account);
        self.mode = Mode::Edit;
    }

    fn submit_form(&mut self) -> Option<Action> {
        let Some(ref account) = self.state.account else {
            return None;
        };
        if let Some(email) = self.form.get("Email") {
            if !email.contains('@') {
                self.form.error = Some("email looks invalid".into());
                return None;
            }
        }

        Some(Action::SaveAccount(Box::new(Account {
            first_name: self.form.get("First name").map(str::to_owned),
            last_name: self.form.get("Last name").map(str::to_owned),
            email: self.form.get("Email").map(str::to_owned),
            lang_key: self.form.get("Language").map(str::to_owned),
            ..account.clone()
        })))
    }

    fn render_view(&self, frame: &mut Frame, area: Rect) {
        let Some(ref account) = self.state.account else {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading profile…", theme::key_hint())),
                area,
            );
            return;
        };

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<12}"), Style::default().fg(theme::DIM_WHITE)),
                Span::styled(value, Style::default().fg(theme::SKY_CYAN)),
            ])
        };

        let role = if account.is_admin() { "admin" } else { "member" };
        let status = if account.activated { "active" } else { "deactivated" };
        let lines = vec![
            Line::from(""),
            field("Login", account.login.clone()),
            field("Name", account.display_name()),
            field("Email", account.email.clone().unwrap_or_else(|| "─".into())),
            field(
                "Language",
                account.lang_key.clone().unwrap_or_else(|| "─".into()),
            ),
            field("Role", role.into()),
            field("Status", status.into()),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_edit(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Edit profile ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let form_area = Rect {
            width: inner.width.min(60),
            ..inner
        };
        self.form.render(frame, form_area);
    }

    fn footer_line(&self) -> Line<'_> {
        let mut spans = Vec::new();
        if self.state.loading {
            spans.push(Span::styled("  loading…", Style::default().fg(theme::WARN_AMBER)));
        }
        if self.state.updating {
            spans.push(Span::styled("  saving…", Style::default().fg(theme::WARN_AMBER)));
        }
        if self.state.update_success || self.saved_flash {
            spans.push(Span::styled("  ✓ profile saved", theme::success_style()));
        }
        Line::from(spans)
    }

    fn hints_line(&self) -> Line<'static> {
        let pairs: &[(&str, &str)] = match self.mode {
            Mode::View => &[("e", "edit"), ("r", "reload"), ("x", "dismiss error")],
            Mode::Edit => &[("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")],
        };
        let mut spans = Vec::with_capacity(pairs.len() * 2 + 1);
        spans.push(Span::raw(" "));
        for (k, label) in pairs {
            spans.push(Span::styled(format!(" {k} "), theme::key_hint_key()));
            spans.push(Span::styled((*label).to_string(), theme::key_hint()));
        }
        Line::from(spans)
    }
}

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.saved_flash = false;
        match self.mode {
            Mode::View => match key.code {
                KeyCode::Char('e') | KeyCode::Enter => {
                    self.enter_edit();
                    Ok(None)
                }
                KeyCode::Char('r') => Ok(Some(Action::LoadAccount)),
                KeyCode::Char('x') => Ok(Some(Action::DismissError)),
                _ => Ok(None),
            },
            Mode::Edit => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::View;
                    Ok(None)
                }
                KeyCode::Enter => Ok(self.submit_form()),
                _ => {
                    self.form.handle_key(key);
                    Ok(None)
                }
            },
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AccountState(state) => {
                if state.error_message != self.state.error_message {
                    self.error_dismissed = false;
                }
                // A settled save drops back to the read-only view.
                if self.mode == Mode::Edit && state.update_success {
                    self.mode = Mode::View;
                }
                self.state = state.clone();
            }
            Action::WriteSettled(ScreenId::Settings) => {
                self.saved_flash = true;
                if self.mode == Mode::Edit {
                    self.mode = Mode::View;
                }
            }
            Action::DismissError => {
                self.error_dismissed = true;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Settings ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_error = self.state.error_message.is_some() && !self.error_dismissed;
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(u16::from(show_error)),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        match self.mode {
            Mode::View => self.render_view(frame, layout[0]),
            Mode::Edit => self.render_edit(frame, layout[0]),
        }

        if show_error {
            if let Some(ref msg) = self.state.error_message {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  ✗ {msg}  (x to dismiss)"),
                        theme::error_style(),
                    )),
                    layout[1],
                );
            }
        }

        frame.render_widget(Paragraph::new(self.footer_line()), layout[2]);
        frame.render_widget(Paragraph::new(self.hints_line()), layout[3]);
    }

    fn wants_text_input(&self) -> bool {
        self.mode == Mode::Edit
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "settings"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_state() -> AccountState {
        AccountState {
            account: Some(Account {
                login: "admin".into(),
                first_name: Some("Ada".into()),
                last_name: Some("Okafor".into()),
                email: Some("ada@club.run".into()),
                lang_key: Some("en".into()),
                activated: true,
                authorities: vec!["ROLE_ADMIN".into()],
            }),
            ..AccountState::default()
        }
    }

    #[test]
    fn edit_fills_the_form_from_the_loaded_account() {
        let mut screen = SettingsScreen::new();
        screen.update(&Action::AccountState(loaded_state())).unwrap();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(screen.wants_text_input());
        assert_eq!(screen.form.get("First name"), Some("Ada"));
        assert_eq!(screen.form.get("Email"), Some("ada@club.run"));
    }

    #[test]
    fn edit_before_load_does_nothing() {
        let mut screen = SettingsScreen::new();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(!screen.wants_text_input());
    }

    #[test]
    fn save_builds_account_from_form() {
        let mut screen = SettingsScreen::new();
        screen.update(&Action::AccountState(loaded_state())).unwrap();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        // Append to the first name before saving.
        screen.handle_key_event(key(KeyCode::Char('m'))).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        match action {
            Some(Action::SaveAccount(a)) => {
                assert_eq!(a.login, "admin");
                assert_eq!(a.first_name.as_deref(), Some("Adam"));
            }
            other => panic!("expected SaveAccount, got {other:?}"),
        }
    }

    #[test]
    fn save_rejects_malformed_email() {
        let mut screen = SettingsScreen::new();
        screen.update(&Action::AccountState(loaded_state())).unwrap();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        // Wipe the email field down to something not address-shaped.
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        for _ in 0.."ada@club.run".len() {
            screen.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        for c in "nope".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(action.is_none());
        assert_eq!(screen.form.error.as_deref(), Some("email looks invalid"));
    }

    #[test]
    fn settled_save_returns_to_the_view_without_a_snapshot() {
        let mut screen = SettingsScreen::new();
        screen.update(&Action::AccountState(loaded_state())).unwrap();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(screen.wants_text_input());

        screen
            .update(&Action::WriteSettled(ScreenId::Settings))
            .unwrap();
        assert!(!screen.wants_text_input());
        assert!(screen.saved_flash);
    }

    #[test]
    fn successful_save_returns_to_the_view() {
        let mut screen = SettingsScreen::new();
        screen.update(&Action::AccountState(loaded_state())).unwrap();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();

        let mut settled = loaded_state();
        settled.update_success = true;
        screen.update(&Action::AccountState(settled)).unwrap();
        assert!(!screen.wants_text_input());
    }
}
