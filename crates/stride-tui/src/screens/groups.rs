//! Groups screen — training group roster with create/edit/delete.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use stride_core::{EntityState, PageQuery, RunningGroup};

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

pub struct GroupsScreen {
    focused: bool,
    state: EntityState<RunningGroup>,
    table_state: TableState,
    query: PageQuery,
    mode: Mode,
    form: Form,
    editing_id: Option<i64>,
    error_dismissed: bool,
    saved_flash: bool,
}

impl GroupsScreen {
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

    fn selected(&self) -> Option<&RunningGroup> {
        self.state.entities.get(self.table_state.selected()?)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.state.entities.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(current.saturating_add_signed(delta).min(len - 1)));
    }

    fn open_form(&mut self, group: Option<&RunningGroup>) {
        let mut form = Form::new(&["Name", "Leader id"]);
        if let Some(g) = group {
            self.editing_id = g.id;
            form.set("Name", g.name.clone());
            form.set(
                "Leader id",
                g.leader_id.map(|id| id.to_string()).unwrap_or_default(),
            );
        } else {
            self.editing_id = None;
        }
        self.form = form;
        self.mode = Mode::Form;
    }

    fn submit_form(&mut self) -> Option<Action> {
        let Some(name) = self.form.get("Name").map(str::to_owned) else {
            self.form.error = Some("name is required".into());
            return None;
        };
        let leader_id = match self.form.get("Leader id") {
            None => None,
            Some(raw) => match raw.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    self.form.error = Some("leader id must be a number".into());
                    return None;
                }
            },
        };

        // member_count and created_date are server-maintained.
        let base = self
            .editing_id
            .and_then(|id| self.state.entities.iter().find(|g| g.id == Some(id)))
            .cloned();

        Some(Action::SaveGroup(Box::new(RunningGroup {
            id: self.editing_id,
            name,
            leader_id,
            member_count: base.as_ref().and_then(|g| g.member_count),
            created_date: base.and_then(|g| g.created_date),
        })))
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Name", "Leader", "Members", "Created"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .state
            .entities
            .iter()
            .map(|g| {
                Row::new(vec![
                    Cell::from(g.id.map(|id| id.to_string()).unwrap_or_default()),
                    Cell::from(g.name.clone()).style(Style::default().fg(theme::SKY_CYAN)),
                    Cell::from(
                        g.leader_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| "─".into()),
                    ),
                    Cell::from(
                        g.member_count
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "─".into()),
                    ),
                    Cell::from(
                        g.created_date
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "─".into()),
                    ),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Fill(3),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(ref group) = self.state.entity else {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading…", theme::key_hint())),
                area,
            );
            return;
        };

        let block = Block::default()
            .title(format!(" {} ", group.name))
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
            field("Name", group.name.clone()),
            field(
                "Leader",
                group
                    .leader_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "─".into()),
            ),
            field(
                "Members",
                group
                    .member_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "─".into()),
            ),
            field(
                "Created",
                group
                    .created_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "─".into()),
            ),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let title = if self.editing_id.is_some() {
            " Edit group "
        } else {
            " New group "
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

impl Component for GroupsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.saved_flash = false;
        match self.mode {
            Mode::Form => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::List;
                    Ok(None)
                }
                KeyCode::Enter => Ok(self.submit_form()),
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
                    let group = self.state.entity.clone();
                    if let Some(ref g) = group {
                        self.open_form(Some(g));
                    }
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
                    Ok(Some(Action::LoadGroups(self.query.clone())))
                }
                KeyCode::Char('p') | KeyCode::Char('[') => {
                    self.query = pager::prev_page(&self.query);
                    Ok(Some(Action::LoadGroups(self.query.clone())))
                }
                KeyCode::Char('r') => Ok(Some(Action::LoadGroups(self.query.clone()))),
                KeyCode::Enter => {
                    let Some(id) = self.selected().and_then(|g| g.id) else {
                        return Ok(None);
                    };
                    self.mode = Mode::Detail;
                    Ok(Some(Action::LoadGroupOne(id)))
                }
                KeyCode::Char('c') => {
                    self.open_form(None);
                    Ok(None)
                }
                KeyCode::Char('e') => {
                    let group = self.selected().cloned();
                    if let Some(ref g) = group {
                        self.open_form(Some(g));
                    }
                    Ok(None)
                }
                KeyCode::Char('d') => {
                    let Some(group) = self.selected() else {
                        return Ok(None);
                    };
                    let Some(id) = group.id else {
                        return Ok(None);
                    };
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteGroup {
                        id,
                        name: group.name.clone(),
                    })))
                }
                KeyCode::Char('x') => Ok(Some(Action::DismissError)),
                _ => Ok(None),
            },
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::GroupsState(state) => {
                if state.error_message != self.state.error_message {
                    self.error_dismissed = false;
                }
                if self.mode == Mode::Form && state.update_success {
                    self.mode = Mode::List;
                }
                self.state = state.clone();
                let len = self.state.entities.len();
                if len > 0 && self.table_state.selected().unwrap_or(0) >= len {
                    self.table_state.select(Some(len - 1));
                }
            }
            Action::WriteSettled(ScreenId::Groups) => {
                self.saved_flash = true;
                if self.mode == Mode::Form {
                    self.mode = Mode::List;
                }
            }
            Action::LoadGroups(query) => {
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
        let title = format!(" Groups ({}) ", self.state.total_items);
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

        let show_error = self.state.error_message.is_some() && !self.error_dismissed;
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(u16::from(show_error)),
            Constraint::Length(1),
            Constraint::Length(1),
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
        "groups"
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

    fn group(id: i64, name: &str) -> RunningGroup {
        RunningGroup {
            id: Some(id),
            name: name.into(),
            leader_id: Some(4),
            member_count: Some(12),
            created_date: None,
        }
    }

    fn screen_with(groups: Vec<RunningGroup>) -> GroupsScreen {
        let mut screen = GroupsScreen::new(PageQuery::default());
        let state = EntityState {
            total_items: groups.len() as u64,
            entities: groups,
            ..EntityState::default()
        };
        screen.update(&Action::GroupsState(state)).unwrap();
        screen
    }

    #[test]
    fn settled_write_closes_the_form_without_a_snapshot() {
        let mut screen = screen_with(vec![]);
        screen.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        assert_eq!(screen.mode, Mode::Form);

        screen
            .update(&Action::WriteSettled(ScreenId::Groups))
            .unwrap();
        assert_eq!(screen.mode, Mode::List);
        assert!(screen.saved_flash);
    }

    #[test]
    fn delete_asks_for_confirmation_with_group_name() {
        let mut screen = screen_with(vec![group(5, "Dawn Patrol")]);
        let action = screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        match action {
            Some(Action::ShowConfirm(ConfirmAction::DeleteGroup { id, name })) => {
                assert_eq!(id, 5);
                assert_eq!(name, "Dawn Patrol");
            }
            other => panic!("expected DeleteGroup confirm, got {other:?}"),
        }
    }

    #[test]
    fn form_submit_requires_name() {
        let mut screen = screen_with(vec![]);
        screen.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(action.is_none());
        assert_eq!(screen.form.error.as_deref(), Some("name is required"));
    }

    #[test]
    fn edit_preserves_server_maintained_fields() {
        let mut screen = screen_with(vec![group(5, "Dawn Patrol")]);
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        match action {
            Some(Action::SaveGroup(g)) => {
                assert_eq!(g.id, Some(5));
                assert_eq!(g.member_count, Some(12));
            }
            other => panic!("expected SaveGroup, got {other:?}"),
        }
    }
}
