//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, controller messages, ticks)
//! - `ButtonController` for everything relationship-related
//! - `DisplayState` for rendering
//!
//! The App:
//! 1. Converts key presses to clicks on the selected button
//! 2. Receives `ButtonMessage`s and updates `DisplayState`
//! 3. Renders based on `DisplayState`

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use socknet_conductor::{
    ButtonAttributes, ButtonController, ButtonId, ButtonMessage, ClickOutcome, FriendApi,
};

use crate::display::{DisplayButton, DisplayState, StatusKind, StatusLine};
use crate::theme::{ACCENT, ACTION_AMBER, ACTION_GREEN, DIM_GRAY, ERROR_RED};

/// Redraw interval while idle
const TICK: Duration = Duration::from_millis(100);

const HELP: &str = "↑/↓ select  Enter click  d dismiss error  q quit";

/// Main application state
pub struct App<A: FriendApi + 'static> {
    /// Is the app still running?
    running: bool,
    /// The embedded controller
    controller: ButtonController<A>,
    /// Messages from the controller
    rx: mpsc::Receiver<ButtonMessage>,
    /// Display state derived from messages
    display: DisplayState,
    /// Selected row
    selected: usize,
}

impl<A: FriendApi + 'static> App<A> {
    /// Create a new App around a controller and its message channel
    pub fn new(controller: ButtonController<A>, rx: mpsc::Receiver<ButtonMessage>) -> Self {
        Self {
            running: true,
            controller,
            rx,
            display: DisplayState::new(),
            selected: 0,
        }
    }

    /// Load a page's buttons, returning how many were skipped
    ///
    /// The message channel must hold at least one message per button.
    pub async fn load_page(&mut self, buttons: Vec<ButtonAttributes>) -> usize {
        self.display.clear();
        self.selected = 0;

        let errors = self.controller.load_page(buttons).await;
        for error in &errors {
            warn!(error = %error, "Button skipped");
        }
        self.process_messages();

        if let Some(first) = errors.first() {
            self.display.status = Some(StatusLine {
                kind: StatusKind::Error,
                text: format!("{} button(s) skipped: {first}", errors.len()),
            });
        }
        errors.len()
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Selected row
    pub fn selected(&self) -> usize {
        self.selected
    }

    fn selected_id(&self) -> Option<ButtonId> {
        self.display
            .get(self.selected)
            .map(|row| row.view.id.clone())
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut events = EventStream::new();

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },
                Some(msg) = self.rx.recv() => self.display.apply_message(msg),
                () = tokio::time::sleep(TICK) => {}
            }

            self.process_messages();
            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Drain every pending controller message into the display state
    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.display.apply_message(msg);
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.display.len() {
                    self.selected += 1;
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    // The outcome arrives as messages; the request keeps
                    // running after the handle is dropped.
                    if let ClickOutcome::Ignored(reason) = self.controller.click(&id).await {
                        debug!(button_id = %id, reason = %reason, "Click ignored");
                    }
                }
            }

            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.controller.dismiss_error(&id).await;
                }
            }

            _ => {}
        }
    }

    /// Draw the whole screen
    pub fn draw(&self, frame: &mut Frame) {
        let [list_area, status_area, help_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let lines: Vec<Line> = if self.display.is_empty() {
            vec![Line::styled(
                "No buttons on this page",
                Style::default().fg(DIM_GRAY),
            )]
        } else {
            self.display
                .buttons()
                .iter()
                .enumerate()
                .map(|(i, row)| button_line(row, i == self.selected))
                .collect()
        };

        let list = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" socknet ", Style::default().fg(ACCENT))),
        );
        frame.render_widget(list, list_area);

        if let Some(ref status) = self.display.status {
            let color = match status.kind {
                StatusKind::Info => ACTION_GREEN,
                StatusKind::Error => ERROR_RED,
            };
            frame.render_widget(
                Paragraph::new(Span::styled(status.text.as_str(), Style::default().fg(color))),
                status_area,
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(HELP, Style::default().fg(DIM_GRAY))),
            help_area,
        );
    }
}

/// One row: selection marker, label, id, pending marker, error
fn button_line(row: &DisplayButton, selected: bool) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };

    let mut label_style = match row.view.status.as_str() {
        "follow" | "accept_friend_request" => Style::default().fg(ACTION_GREEN),
        _ => Style::default().fg(ACTION_AMBER),
    };
    if row.pending {
        label_style = Style::default().fg(DIM_GRAY);
    }
    if selected {
        label_style = label_style.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(ACCENT)),
        Span::styled(format!("[ {} ]", row.view.label), label_style),
        Span::styled(format!("  {}", row.view.id), Style::default().fg(DIM_GRAY)),
    ];
    if row.pending {
        spans.push(Span::styled("  …", Style::default().fg(DIM_GRAY)));
    }
    if let Some(ref error) = row.view.error {
        spans.push(Span::styled(
            format!("  {error}"),
            Style::default().fg(ERROR_RED),
        ));
    }
    Line::from(spans)
}
