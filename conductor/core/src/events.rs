//! Surface Events
//!
//! Events sent from UI surfaces to the controller. Surfaces report what
//! happened; the controller decides what it means.

use serde::{Deserialize, Serialize};

use crate::button::{ButtonAttributes, ButtonId};

/// Events from surface to controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// A page was rendered with these buttons
    PageLoaded {
        /// Attributes bound to each button, in render order
        buttons: Vec<ButtonAttributes>,
    },

    /// A known button was clicked
    ButtonClicked {
        /// Button identifier
        id: ButtonId,
    },

    /// An element was clicked; its bound attributes are read at click time
    ElementClicked {
        /// Attributes bound to the clicked element
        attributes: ButtonAttributes,
    },

    /// The user dismissed the error shown on a button
    ErrorDismissed {
        /// Button identifier
        id: ButtonId,
    },
}
