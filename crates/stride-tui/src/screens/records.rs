//! Records screen — paged run log with verification and editing.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use stride_core::model::record as run_fmt;
use stride_core::{EntityState, PageQuery, RunningRecord};

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

pub struct RecordsScreen {
    focused: bool,
    state: EntityState<RunningRecord>,
    table_state: TableState,
    query: PageQuery,
    mode: Mode,
    form: Form,
    editing_id: Option<i64>,
    error_dismissed: bool,
    saved_flash: bool,
}

impl RecordsScreen {
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

    fn selected(&self) -> Option<&RunningRecord> {
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

    fn open_form(&mut self, record: Option<&RunningRecord>) {
        let mut form = Form::new(&["Member id", "Distance meters", "Duration seconds"]);
        if let Some(r) = record {
            self.editing_id = r.id;
            form.set("Member id", r.user_id.to_string());
            form.set("Distance meters", r.distance_meters.to_string());
            form.set("Duration seconds", r.duration_seconds.to_string());
        } else {
            self.editing_id = None;
        }
        self.form = form;
        self.mode = Mode::Form;
    }

    fn submit_form(&mut self) -> Option<Action> {
        let Some(user_id) = self.form.get("Member id").and_then(|v| v.parse().ok()) else {
            self.form.error = Some("member id must be a number".into());
            return None;
        };
        let Some(distance_meters) = self
            .form
            .get("Distance meters")
            .and_then(|v| v.parse().ok())
        else {
            self.form.error = Some("distance must be a number of meters".into());
            return None;
        };
        let Some(duration_seconds) = self
            .form
            .get("Duration seconds")
            .and_then(|v| v.parse().ok())
        else {
            self.form.error = Some("duration must be a number of seconds".into());
            return None;
        };

        // Keep date and verification flag when editing; edits to a
        // verified record drop back to unverified server-side, not here.
        let base = self
            .editing_id
            .and_then(|id| self.state.entities.iter().find(|r| r.id == Some(id)))
            .cloned();

        Some(Action::SaveRecord(Box::new(RunningRecord {
            id: self.editing_id,
            user_id,
            distance_meters,
            duration_seconds,
            record_date: base.as_ref().and_then(|r| r.record_date),
            verified: base.is_some_and(|r| r.verified),
        })))
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Member", "Distance", "Duration", "Pace", "Date", "✓"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .state
            .entities
            .iter()
            .map(|r| {
                let verified_cell = if r.verified {
                    Cell::from("✓").style(Style::default().fg(theme::SUCCESS_GREEN))
                } else {
                    Cell::from("·").style(Style::default().fg(theme::DIM_WHITE))
                };
                Row::new(vec![
                    Cell::from(r.id.map(|id| id.to_string()).unwrap_or_default()),
                    Cell::from(r.user_id.to_string()).style(Style::default().fg(theme::SKY_CYAN)),
                    Cell::from(run_fmt::fmt_distance(r.distance_meters)),
                    Cell::from(run_fmt::fmt_duration(r.duration_seconds)),
                    Cell::from(run_fmt::fmt_pace(r.pace_secs_per_km())),
                    Cell::from(
                        r.record_date
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "─".into()),
                    ),
                    verified_cell,
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Length(12),
                Constraint::Length(3),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(ref record) = self.state.entity else {
            frame.render_widget(
                Paragraph::new(Span::styled("  loading…", theme::key_hint())),
                area,
            );
            return;
        };

        let block = Block::default()
            .title(format!(
                " Record #{} ",
                record.id.map(|id| id.to_string()).unwrap_or_default()
            ))
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
            field("Member", record.user_id.to_string()),
            field("Distance", run_fmt::fmt_distance(record.distance_meters)),
            field("Duration", run_fmt::fmt_duration(record.duration_seconds)),
            field("Pace", run_fmt::fmt_pace(record.pace_secs_per_km())),
            field(
                "Date",
                record
                    .record_date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "─".into()),
            ),
            field(
                "Verified",
                if record.verified { "yes".into() } else { "no".into() },
            ),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let title = if self.editing_id.is_some() {
            " Edit record "
        } else {
            " New record "
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
                ("v", "verify"),
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

impl Component for RecordsScreen {
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
                    let record = self.state.entity.clone();
                    if let Some(ref r) = record {
                        self.open_form(Some(r));
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
                    Ok(Some(Action::LoadRecords(self.query.clone())))
                }
                KeyCode::Char('p') | KeyCode::Char('[') => {
                    self.query = pager::prev_page(&self.query);
                    Ok(Some(Action::LoadRecords(self.query.clone())))
                }
                KeyCode::Char('r') => Ok(Some(Action::LoadRecords(self.query.clone()))),
                KeyCode::Enter => {
                    let Some(id) = self.selected().and_then(|r| r.id) else {
                        return Ok(None);
                    };
                    self.mode = Mode::Detail;
                    Ok(Some(Action::LoadRecordOne(id)))
                }
                KeyCode::Char('c') => {
                    self.open_form(None);
                    Ok(None)
                }
                KeyCode::Char('e') => {
                    let record = self.selected().cloned();
                    if let Some(ref r) = record {
                        self.open_form(Some(r));
                    }
                    Ok(None)
                }
                KeyCode::Char('v') => {
                    let Some(record) = self.selected() else {
                        return Ok(None);
                    };
                    if record.verified {
                        return Ok(None);
                    }
                    Ok(Some(Action::ShowConfirm(ConfirmAction::VerifyRecord {
                        record: Box::new(record.clone()),
                    })))
                }
                KeyCode::Char('d') => {
                    let Some(record) = self.selected() else {
                        return Ok(None);
                    };
                    let Some(id) = record.id else {
                        return Ok(None);
                    };
                    let label = format!(
                        "{} by member {}",
                        run_fmt::fmt_distance(record.distance_meters),
                        record.user_id
                    );
                    Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteRecord {
                        id,
                        label,
                    })))
                }
                KeyCode::Char('x') => Ok(Some(Action::DismissError)),
                _ => Ok(None),
            },
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RecordsState(state) => {
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
            Action::WriteSettled(ScreenId::Records) => {
                self.saved_flash = true;
                if self.mode == Mode::Form {
                    self.mode = Mode::List;
                }
            }
            Action::LoadRecords(query) => {
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
        let title = format!(" Records ({}) ", self.state.total_items);
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
        "records"
    }
}
