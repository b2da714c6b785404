//! Members screen — paged member table with detail, edit, and status flips.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use stride_core::{EntityState, PageQuery, UserInfo, UserStatus};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{form::Form, pager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    List,
    Detail,
    Form,
}

pub struct MembersScreen {
    focused: bool,
    state: EntityState<UserInfo>,
    table_state: TableState,
    query: PageQuery,
    mode: Mode,
    form: Form,
    /// Id being edited; `None` while the form creates a new member.
    editing_id: Option<i64>,
    error_dismissed: bool,
    /// Set when a write settles; keeps the saved marker visible until
    /// the next key press even if the snapshot no longer carries it.
    saved_flash: bool,
}

impl MembersScreen {
    pub fn new(query: PageQuery) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            focused: false,
            state: EntityState::default(),
            table_state,
            query,
            mode: Mode::List,
            form: Form::default(),
            editing_id: None,
            error_dismissed: false,
            saved_flash: false,
        }
    }

    fn selected(&self) -> Option<&UserInfo> {
        self.state.entities.get(self.table_state.selected()?)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.state.entities.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(len - 1);
        self.table_state.select(Some(next));
    }

    fn open_form(&mut self, member: Option<&UserInfo>) {
        let mut form = Form::new(&["Login", "Nickname", "Email", "Group id"]);
        if let Some(m) = member {
            self.editing_id = m.id;
            form.set("Login", m.login.clone());
            form.set("Nickname", m.nickname.clone().unwrap_or_default());
            form.set("Email", m.email.clone().unwrap_or_default());
            form.set(
                "Group id",
                m.group_id.map(|id| id.to_string()).unwrap_or_default(),
            );
        } else {
            self.editing_id = None;
        }
        self.form = form;
        self.mode = Mode::Form;
    }

    /// Build the member from form fields, or set a validation message.
    fn submit_form(&mut self) -> Option<Action> {
        let Some(login) = self.form.get("Login").map(str::to_owned) else {
            self.form.error = Some("login is required".into());
            return None;
        };

        let group_id = match self.form.get("Group id") {
            None => None,
            Some(raw) => match raw.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    self.form.error = Some("group id must be a number".into());
                    return None;
                }
            },
        };

        // Preserve fields the form does not expose when editing.
        let base = self
            .editing_id
            .and_then(|id| self.state.entities.iter().find(|m| m.id == Some(id)))
            .cloned()
            .unwrap_or_default();

        Some(Action::SaveMember(Box::new(UserInfo {
            id: self.editing_id,
            login,
            nickname: self.form.get("Nickname").map(str::to_owned),
            email: self.form.get("Email").map(str::to_owned),
            group_id,
            ..base
        })))
    }

    fn status_confirm(&self, to: UserStatus) -> Option<Action> {
        let member = self.selected()?;
        if member.status == to {
            return None;
        }
        Some(Action::ShowConfirm(ConfirmAction::ChangeMemberStatus {
            member: Box::new(member.clone()),
            to,
        }))
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Login", "Nickname", "Email", "Status", "Group"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .state
            .entities
            .iter()
            .map(|m| {
                let status_style = if m.status.is_active() {
                    Style::default().fg(theme::SUCCESS_GREEN)
                } else {
                    Style::default().fg(theme::WARN_AMBER)
                };
                Row::new(vec![
                    Cell::from(m.id.map(|id| id.to_string()).unwrap_or_default()),
                    Cell::from(m.login.clone()).style(Style::default().fg(theme::SKY_CYAN)),
                    Cell::from(m.nickname.clone().unwrap_or_else(|| "─".into())),
                    Cell::from(m.email.clone().unwrap_or_else(|| "─".into())),
                    Cell::from(m.status.to_string()).style(status_style),
                    Cell::from(m.group_id.map(|id| id.to_string()).unwrap_or_else(|| "─".into())),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(3),
                Constraint::Length(8),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(ref member) = self.state.entity else {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading…", theme::key_hint())),
                area,
            );
            return;
        };

        let block = Block::default()
            .title(format!(" {} ", member.display_name()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<12}"), Style::default().fg(theme::DIM_WHITE)),
                Span::styled(value, Style::default().fg(theme::SKY_CYAN)),
            ])
        };

        let lines = vec![
            Line::from(""),
            field("Login", member.login.clone()),
            field(
                "Nickname",
                member.nickname.clone().unwrap_or_else(|| "─".into()),
            ),
            field("Email", member.email.clone().unwrap_or_else(|| "─".into())),
            field("Status", member.status.to_string()),
            field(
                "Group",
                member
                    .group_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "─".into()),
            ),
            field(
                "Joined",
                member
                    .joined_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "─".into()),
            ),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let title = if self.editing_id.is_some() {
            " Edit member "
        } else {
            " New member "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.form.render(frame, inner);
    }

    fn footer_line(&self) -> Line<'_> {
        let mut spans = vec![Span::styled(
            format!("  {}", pager::page_line(&self.query, self.state.total_items)),
            theme::key_hint(),
        )];
        if self.state.loading {
            spans.push(Span::styled("  loading…", Style::default().fg(theme::WARN_AMBER)));
        }
        if self.state.updating {
            spans.push(Span::styled("  saving…", Style::default().fg(theme::WARN_AMBER)));
        }
        if self.state.update_success || self.saved_flash {
            spans.push(Span::styled("  ✓ saved", theme::success_style()));
        }
        Line::from(spans)
    }

    fn hints_line(&self) -> Line<'static> {
        let pairs: &[(&str, &str)] = match self.mode {
            Mode::List => &[
                ("j/k", "move"),
                ("n/p", "page"),
                ("Enter", "detail"),
                ("c", "new"),
                ("e", "edit"),
                ("f/a", "freeze/activate"),
                ("d", "delete"),
                ("r", "refresh"),
            ],
            Mode::Detail => &[("e", "edit"), ("Esc", "back")],
            Mode::Form => &[("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")],
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

impl Component for MembersScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.saved_flash = false;
        match self.mode {
            Mode::Form => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::List;
                    Ok(None)
                }
                KeyCode::Enter => {
                    let action = self.submit_form();
                    Ok(action)
                }
                _ => {
                    self.form.handle_key(key);
                    Ok(None)
                }
            },

            Mode::Detail => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::List;
                    Ok(None)
                }
                KeyCode::Char('e') => {
                    let member = self.state.entity.clone();
                    self.open_form(member.as_ref());
                    Ok(None)
                }
                _ => Ok(None),
            },

            Mode::List => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.move_selection(1);
                    Ok(None)
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.move_selection(-1);
                    Ok(None)
                }
                KeyCode::Char('g') => {
                    self.table_state.select(Some(0));
                    Ok(None)
                }
                KeyCode::Char('G') => {
                    let len = self.state.entities.len();
                    if len > 0 {
                        self.table_state.select(Some(len - 1));
                    }
                    Ok(None)
                }
                KeyCode::Char('n') | KeyCode::Char(']') => {
                    self.query = pager::next_page(&self.query, self.state.total_items);
                    Ok(Some(Action::LoadMembers(self.query.clone())))
                }
                KeyCode::Char('p') | KeyCode::Char('[') => {
                    self.query = pager::prev_page(&self.query);
                    Ok(Some(Action::LoadMembers(self.query.clone())))
                }
                KeyCode::Char('r') => Ok(Some(Action::LoadMembers(self.query.clone()))),
                KeyCode::Enter => {
                    let Some(id) = self.selected().and_then(|m| m.id) else {
                        return Ok(None);
                    };
                    self.mode = Mode::Detail;
                    Ok(Some(Action::LoadMemberOne(id)))
                }
                KeyCode::Char('c') => {
                    self.open_form(None);
                    Ok(None)
                }
                KeyCode::Char('e') => {
                    let member = self.selected().cloned();
                    if let Some(ref m) = member {
                        self.open_form(Some(m));
                    }
                    Ok(None)
                }
                KeyCode::Char('f') => Ok(self.status_confirm(UserStatus::Frozen)),
                KeyCode::Char('a') => Ok(self.status_confirm(UserStatus::Active)),
                KeyCode::Char('d') => {
                    let Some(member) = self.selected() else {
                        return Ok(None);
                    };
                    let Some(id) = member.id else {
                        return Ok(None);
                    };
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteMember {
                        id,
                        name: member.display_name().to_owned(),
                    })))
                }
                KeyCode::Char('x') => Ok(Some(Action::DismissError)),
                _ => Ok(None),
            },
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::MembersState(state) => {
                if state.error_message != self.state.error_message {
                    self.error_dismissed = false;
                }
                // A settled write closes the form.
                if self.mode == Mode::Form && state.update_success {
                    self.mode = Mode::List;
                }
                self.state = state.clone();
                let len = self.state.entities.len();
                if len > 0 && self.table_state.selected().unwrap_or(0) >= len {
                    self.table_state.select(Some(len - 1));
                }
            }
            // The watch channel may coalesce the update_success snapshot
            // away, so form-close also listens to the direct completion.
            Action::WriteSettled(ScreenId::Members) => {
                self.saved_flash = true;
                if self.mode == Mode::Form {
                    self.mode = Mode::List;
                }
            }
            Action::LoadMembers(query) => {
                self.query = query.clone();
            }
            Action::DismissError => {
                self.error_dismissed = true;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Members ({}) ", self.state.total_items);
        let block = Block::default()
            .title(title)
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

        let show_error =
            self.state.error_message.is_some() && !self.error_dismissed;
        let layout = Layout::vertical([
            Constraint::Min(1),                                // content
            Constraint::Length(u16::from(show_error)),         // error banner
            Constraint::Length(1),                             // footer
            Constraint::Length(1),                             // hints
        ])
        .split(inner);

        match self.mode {
            Mode::Form => self.render_form(frame, layout[0]),
            Mode::Detail => {
                let halves =
                    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(layout[0]);
                self.render_table(frame, halves[0]);
                self.render_detail(frame, halves[1]);
            }
            Mode::List => self.render_table(frame, layout[0]),
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
        self.mode == Mode::Form
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "members"
    }
}
