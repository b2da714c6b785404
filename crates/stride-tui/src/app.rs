//! Application loop — owns the screens, the action channel, and the
//! console handle.
//!
//! Keys become [`Action`]s, intents spawn console calls, and slice
//! snapshots stream back in through the data bridge. The loop itself
//! never blocks on the network.

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stride_core::Console;

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const TICK_RATE: Duration = Duration::from_millis(250);
const RENDER_RATE: Duration = Duration::from_millis(33);

pub struct App {
    console: Console,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    active: ScreenId,
    help_visible: bool,
    pending_confirm: Option<ConfirmAction>,
    server_label: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    should_quit: bool,
}

impl App {
    pub fn new(console: Console) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&console.default_query());
        let server_label = console.config().url.to_string();
        Self {
            console,
            screens,
            active: ScreenId::Members,
            help_visible: false,
            pending_confirm: None,
            server_label,
            action_tx,
            action_rx,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(crate::data_bridge::run_data_bridge(
            self.console.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active) {
            screen.set_focused(true);
        }
        info!(server = %self.server_label, "console session started");
        self.process_action(Self::entry_intent(&self.console, self.active))?;

        while !self.should_quit {
            let Some(event) = events.next().await else {
                break;
            };
            match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Render => {
                    tui.draw(|frame| self.render(frame))?;
                }
                Event::Tick | Event::Resize(_, _) => {}
            }
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(action)?;
            }
        }

        events.stop();
        cancel.cancel();
        let _ = bridge.await;
        tui.exit()?;
        debug!("console session ended");
        Ok(())
    }

    /// Data to load when a screen becomes active.
    fn entry_intent(console: &Console, screen: ScreenId) -> Action {
        match screen {
            ScreenId::Members => Action::LoadMembers(console.default_query()),
            ScreenId::Records => Action::LoadRecords(console.default_query()),
            ScreenId::Groups => Action::LoadGroups(console.default_query()),
            ScreenId::Settings => Action::LoadAccount,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Ctrl-C quits no matter what is on screen.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.pending_confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.process_action(Action::ConfirmYes)?,
                KeyCode::Char('n') | KeyCode::Esc => self.process_action(Action::ConfirmNo)?,
                _ => {}
            }
            return Ok(());
        }

        if self.help_visible {
            self.help_visible = false;
            return Ok(());
        }

        // Single-key shortcuts are suspended while a form owns the keyboard.
        let typing = self
            .screens
            .get(&self.active)
            .is_some_and(|s| s.wants_text_input());
        if !typing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('?') => {
                    self.help_visible = true;
                    return Ok(());
                }
                KeyCode::Char(c @ '1'..='4') => {
                    if let Some(id) = ScreenId::from_number(c as u8 - b'0') {
                        self.switch_screen(id)?;
                    }
                    return Ok(());
                }
                KeyCode::Tab => {
                    self.switch_screen(self.active.next())?;
                    return Ok(());
                }
                KeyCode::BackTab => {
                    self.switch_screen(self.active.prev())?;
                    return Ok(());
                }
                _ => {}
            }
        }

        let action = if let Some(screen) = self.screens.get_mut(&self.active) {
            screen.handle_key_event(key)?
        } else {
            None
        };
        if let Some(action) = action {
            self.process_action(action)?;
        }
        Ok(())
    }

    fn switch_screen(&mut self, to: ScreenId) -> Result<()> {
        if to == self.active {
            return Ok(());
        }
        if let Some(screen) = self.screens.get_mut(&self.active) {
            screen.set_focused(false);
        }
        // Leaving Settings clears the account slice so a later visit
        // starts from a fresh load rather than a stale snapshot.
        if self.active == ScreenId::Settings {
            self.console.account().reset();
        }
        self.active = to;
        if let Some(screen) = self.screens.get_mut(&self.active) {
            screen.set_focused(true);
        }
        debug!(screen = %to, "switched screen");
        self.process_action(Self::entry_intent(&self.console, to))
    }

    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Tick | Action::Render | Action::Resize(_, _) => {}

            Action::SwitchScreen(id) => self.switch_screen(id)?,
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.process_action(confirm.accept())?;
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            // Slice snapshots go to every screen so background tabs
            // stay current.
            Action::MembersState(_)
            | Action::RecordsState(_)
            | Action::GroupsState(_)
            | Action::AccountState(_)
            | Action::WriteSettled(_) => {
                for screen in self.screens.values_mut() {
                    if let Some(follow) = screen.update(&action)? {
                        let _ = self.action_tx.send(follow);
                    }
                }
            }

            Action::DismissError => {
                if let Some(screen) = self.screens.get_mut(&self.active) {
                    let _ = screen.update(&Action::DismissError)?;
                }
            }

            Action::ResetAccount => self.console.account().reset(),

            // Console intents: mirror to the active screen (pagination
            // bookkeeping), then run the call off the UI loop.
            intent => {
                if let Some(screen) = self.screens.get_mut(&self.active) {
                    if let Some(follow) = screen.update(&intent)? {
                        let _ = self.action_tx.send(follow);
                    }
                }
                self.spawn_intent(intent);
            }
        }
        Ok(())
    }

    /// Run a console call in the background. Outcomes land in the store
    /// and come back through the data bridge; the returned error is the
    /// same one the slice already recorded, so it is only logged. A
    /// successful write additionally sends [`Action::WriteSettled`]: the
    /// watch channel only keeps the latest snapshot, so the transient
    /// `update_success` state can be skipped over, and screens need a
    /// delivery of the completion they can rely on.
    fn spawn_intent(&self, intent: Action) {
        let console = self.console.clone();
        let action_tx = self.action_tx.clone();
        let settles = write_target(&intent);
        tokio::spawn(async move {
            let outcome = match intent {
                Action::LoadMembers(query) => console.members().fetch_list(&query).await,
                Action::LoadMemberOne(id) => console.members().fetch_one(id).await,
                Action::SaveMember(member) => {
                    if member.id.is_some() {
                        console.members().update(*member).await
                    } else {
                        console.members().create(*member).await
                    }
                }
                Action::DeleteMember(id) => console.members().remove(id).await,

                Action::LoadRecords(query) => console.records().fetch_list(&query).await,
                Action::LoadRecordOne(id) => console.records().fetch_one(id).await,
                Action::SaveRecord(record) => {
                    if record.id.is_some() {
                        console.records().update(*record).await
                    } else {
                        console.records().create(*record).await
                    }
                }
                Action::DeleteRecord(id) => console.records().remove(id).await,

                Action::LoadGroups(query) => console.groups().fetch_list(&query).await,
                Action::LoadGroupOne(id) => console.groups().fetch_one(id).await,
                Action::SaveGroup(group) => {
                    if group.id.is_some() {
                        console.groups().update(*group).await
                    } else {
                        console.groups().create(*group).await
                    }
                }
                Action::DeleteGroup(id) => console.groups().remove(id).await,

                Action::LoadAccount => console.account().load().await,
                Action::SaveAccount(account) => console.account().save(&account).await,

                _ => Ok(()),
            };
            match outcome {
                Ok(()) => {
                    if let Some(screen) = settles {
                        let _ = action_tx.send(Action::WriteSettled(screen));
                    }
                }
                Err(err) => debug!(error = %err, "console call failed"),
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // active screen
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

        self.render_tabs(frame, layout[0]);
        if let Some(screen) = self.screens.get(&self.active) {
            screen.render(frame, layout[1]);
        }
        self.render_status(frame, layout[2]);

        if let Some(ref confirm) = self.pending_confirm {
            render_confirm(frame, confirm);
        }
        if self.help_visible {
            render_help(frame);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for id in ScreenId::ALL {
            let style = if id == self.active {
                theme::tab_active()
            } else {
                theme::tab_inactive()
            };
            spans.push(Span::styled(format!(" {} {} ", id.number(), id.label()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.server_label),
                Style::default().fg(theme::SKY_CYAN),
            ),
            Span::styled("· ", theme::key_hint()),
            Span::styled(" ? ", theme::key_hint_key()),
            Span::styled("help ", theme::key_hint()),
            Span::styled(" q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

}

/// The screen whose write this intent settles, or `None` for reads and
/// non-console actions.
fn write_target(intent: &Action) -> Option<ScreenId> {
    match intent {
        Action::SaveMember(_) | Action::DeleteMember(_) => Some(ScreenId::Members),
        Action::SaveRecord(_) | Action::DeleteRecord(_) => Some(ScreenId::Records),
        Action::SaveGroup(_) | Action::DeleteGroup(_) => Some(ScreenId::Groups),
        Action::SaveAccount(_) => Some(ScreenId::Settings),
        _ => None,
    }
}

/// Modal asking the user to approve a destructive or state-changing
/// operation.
fn render_confirm(frame: &mut Frame, confirm: &ConfirmAction) {
    let message = confirm.to_string();
    let width = u16::try_from(message.len() + 6)
        .unwrap_or(u16::MAX)
        .clamp(30, frame.area().width.saturating_sub(4).max(30));
    let area = centered_rect(frame.area(), width, 5);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::WARN_AMBER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm  ", theme::key_hint()),
            Span::styled(" n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 46, 16);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Keys ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entry = |k: &'static str, label: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(label, theme::key_hint()),
        ])
    };
    let lines = vec![
        Line::from(""),
        entry("1-4", "switch screen"),
        entry("Tab", "next screen"),
        entry("j/k", "move selection"),
        entry("n/p", "next / previous page"),
        entry("Enter", "open detail"),
        entry("c / e / d", "create / edit / delete"),
        entry("f / a", "freeze / activate member"),
        entry("v", "verify record"),
        entry("x", "dismiss error"),
        entry("q", "quit"),
        Line::from(""),
        Line::from(Span::styled("  any key to close", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// A rect of the given size centered in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn write_intents_settle_on_their_own_screen() {
        assert_eq!(write_target(&Action::DeleteMember(1)), Some(ScreenId::Members));
        assert_eq!(write_target(&Action::DeleteRecord(1)), Some(ScreenId::Records));
        assert_eq!(write_target(&Action::DeleteGroup(1)), Some(ScreenId::Groups));
        assert_eq!(
            write_target(&Action::SaveAccount(Box::default())),
            Some(ScreenId::Settings)
        );
        assert_eq!(write_target(&Action::LoadAccount), None);
        assert_eq!(write_target(&Action::Tick), None);
    }

    #[test]
    fn centered_rect_is_clamped_to_the_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect(area, 100, 100);
        assert_eq!(rect, area);
    }

    #[test]
    fn centered_rect_centers_smaller_rects() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(area, 40, 10);
        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 7);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);
    }
}
