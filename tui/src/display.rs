//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from `ButtonMessage`s and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client": it renders what the controller tells it to.
//! Button labels only ever come from the [`ButtonView`]s carried by messages.

use socknet_conductor::{ButtonId, ButtonMessage, ButtonView};

/// A button row as drawn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayButton {
    /// Latest view from the controller
    pub view: ButtonView,
    /// Whether an action is in flight
    pub pending: bool,
}

/// Severity of the status line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// Something worked
    Info,
    /// Something was refused or failed
    Error,
}

/// One-line notice under the button list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Severity
    pub kind: StatusKind,
    /// Text
    pub text: String,
}

/// Everything the renderer needs
#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    buttons: Vec<DisplayButton>,
    /// Latest notice, if any
    pub status: Option<StatusLine>,
}

impl DisplayState {
    /// Create an empty display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons in page order
    pub fn buttons(&self) -> &[DisplayButton] {
        &self.buttons
    }

    /// Button at a row
    pub fn get(&self, index: usize) -> Option<&DisplayButton> {
        self.buttons.get(index)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Forget every button (page reload)
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.status = None;
    }

    /// Apply a controller message
    pub fn apply_message(&mut self, msg: ButtonMessage) {
        match msg {
            ButtonMessage::Rendered(view) | ButtonMessage::Pending { view, .. } => {
                self.upsert(view);
            }
            ButtonMessage::Updated(view) => {
                self.status = Some(StatusLine {
                    kind: StatusKind::Info,
                    text: format!("{}: now {}", view.id, view.label),
                });
                self.upsert(view);
            }
            ButtonMessage::ActionFailed { view, error } => {
                self.status = Some(StatusLine {
                    kind: StatusKind::Error,
                    text: format!("{}: {error}", view.id),
                });
                self.upsert(view);
            }
            ButtonMessage::Rejected { id, reason } => {
                self.status = Some(StatusLine {
                    kind: StatusKind::Error,
                    text: format!("{id}: {reason}"),
                });
            }
        }
    }

    /// A disabled button is one with an action in flight
    fn upsert(&mut self, view: ButtonView) {
        let pending = !view.enabled;
        match self.position(&view.id) {
            Some(index) => self.buttons[index] = DisplayButton { view, pending },
            None => self.buttons.push(DisplayButton { view, pending }),
        }
    }

    fn position(&self, id: &ButtonId) -> Option<usize> {
        self.buttons.iter().position(|b| &b.view.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(id: &str, label: &str, enabled: bool, error: Option<&str>) -> ButtonView {
        ButtonView {
            id: ButtonId::new(id),
            label: label.to_string(),
            status: label.to_lowercase(),
            enabled,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_rendered_keeps_page_order() {
        let mut display = DisplayState::new();
        display.apply_message(ButtonMessage::Rendered(view("a", "Follow", true, None)));
        display.apply_message(ButtonMessage::Rendered(view("b", "Unfriend", true, None)));

        let ids: Vec<_> = display.buttons().iter().map(|b| b.view.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_pending_then_updated() {
        let mut display = DisplayState::new();
        display.apply_message(ButtonMessage::Rendered(view("a", "Follow", true, None)));
        display.apply_message(ButtonMessage::Pending {
            id: ButtonId::new("a"),
            view: view("a", "Follow", false, None),
        });
        assert!(display.get(0).unwrap().pending);

        display.apply_message(ButtonMessage::Updated(view("a", "Unfollow", true, None)));
        let row = display.get(0).unwrap();
        assert!(!row.pending);
        assert_eq!(row.view.label, "Unfollow");
        assert_eq!(display.len(), 1);
        assert_eq!(display.status.as_ref().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn test_disabled_view_stays_pending() {
        let mut display = DisplayState::new();
        display.apply_message(ButtonMessage::Pending {
            id: ButtonId::new("a"),
            view: view("a", "Follow", false, None),
        });
        display.apply_message(ButtonMessage::Rendered(view("a", "Follow", false, None)));
        assert!(display.get(0).unwrap().pending);

        display.apply_message(ButtonMessage::Rendered(view("a", "Follow", true, None)));
        assert!(!display.get(0).unwrap().pending);
    }

    #[test]
    fn test_failure_shows_error() {
        let mut display = DisplayState::new();
        display.apply_message(ButtonMessage::ActionFailed {
            view: view("a", "Follow", true, Some("Request rejected (403)")),
            error: "backend returned 403: ".to_string(),
        });

        let row = display.get(0).unwrap();
        assert_eq!(row.view.label, "Follow");
        assert_eq!(row.view.error.as_deref(), Some("Request rejected (403)"));
        assert_eq!(display.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_rejected_only_touches_status() {
        let mut display = DisplayState::new();
        display.apply_message(ButtonMessage::Rejected {
            id: ButtonId::new("x"),
            reason: "no button with id x".to_string(),
        });
        assert!(display.is_empty());
        assert!(display.status.unwrap().text.contains("no button"));
    }
}
