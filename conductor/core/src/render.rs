//! Button Rendering
//!
//! Surfaces never read the view-model directly. They receive a [`ButtonView`],
//! the visual projection of an [`ActionButton`], and draw it however they
//! like.

use serde::{Deserialize, Serialize};

use crate::button::{ActionButton, ButtonId, ButtonPhase};

/// What a surface draws for one button
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonView {
    /// Element identifier
    pub id: ButtonId,
    /// Visible label
    pub label: String,
    /// Status wire string, for surfaces that re-bind it to markup
    pub status: String,
    /// Whether the button accepts clicks
    pub enabled: bool,
    /// Error shown next to the button after a failed action
    pub error: Option<String>,
}

impl From<&ActionButton> for ButtonView {
    fn from(button: &ActionButton) -> Self {
        let (enabled, error) = match &button.phase {
            ButtonPhase::Idle => (true, None),
            ButtonPhase::Pending => (false, None),
            ButtonPhase::Failed { reason } => (true, Some(reason.clone())),
        };

        Self {
            id: button.id.clone(),
            label: button.display_label().to_string(),
            status: button.status.as_str().to_string(),
            enabled,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::AuthorId;
    use crate::status::ButtonStatus;

    fn button() -> ActionButton {
        ActionButton::new(
            ButtonId::new("follow-bob"),
            ButtonStatus::Follow,
            AuthorId(uuid::Uuid::nil()),
            false,
            "bob",
        )
    }

    #[test]
    fn test_idle_view() {
        let view = ButtonView::from(&button());
        assert_eq!(view.label, "Follow");
        assert_eq!(view.status, "follow");
        assert!(view.enabled);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_pending_view_disabled() {
        let mut b = button();
        b.mark_pending();
        let view = ButtonView::from(&b);
        assert!(!view.enabled);
        assert_eq!(view.label, "Follow");
    }

    #[test]
    fn test_failed_view_shows_error() {
        let mut b = button();
        b.mark_failed("Could not reach the server");
        let view = ButtonView::from(&b);
        assert!(view.enabled);
        assert_eq!(view.error.as_deref(), Some("Could not reach the server"));
        assert_eq!(view.label, "Follow");
    }
}
