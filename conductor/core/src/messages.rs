//! Controller Messages
//!
//! Messages sent from the controller to UI surfaces. A surface keeps no
//! relationship logic of its own; it redraws whatever these messages say.

use serde::{Deserialize, Serialize};

use crate::button::ButtonId;
use crate::render::ButtonView;

/// Messages from controller to surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonMessage {
    /// A button was placed on the page
    Rendered(ButtonView),

    /// An action for this button is in flight
    Pending {
        /// Button identifier
        id: ButtonId,
        /// View while the action is pending
        view: ButtonView,
    },

    /// An action succeeded; the button shows its next status
    Updated(ButtonView),

    /// An action failed; status and label are unchanged
    ActionFailed {
        /// View including the error text
        view: ButtonView,
        /// Full error description
        error: String,
    },

    /// A click was not turned into a request
    Rejected {
        /// Element the click came from
        id: ButtonId,
        /// Why nothing was sent
        reason: String,
    },
}

impl ButtonMessage {
    /// Button this message refers to
    #[must_use]
    pub fn button_id(&self) -> &ButtonId {
        match self {
            Self::Rendered(view) | Self::Updated(view) => &view.id,
            Self::ActionFailed { view, .. } => &view.id,
            Self::Pending { id, .. } | Self::Rejected { id, .. } => id,
        }
    }

    /// View to draw, if the message carries one
    #[must_use]
    pub fn view(&self) -> Option<&ButtonView> {
        match self {
            Self::Rendered(view) | Self::Updated(view) => Some(view),
            Self::Pending { view, .. } | Self::ActionFailed { view, .. } => Some(view),
            Self::Rejected { .. } => None,
        }
    }
}
