//! Action Button View-Model
//!
//! A rendered page carries one action button per relationship it offers. The
//! markup binds each button's data as plain attributes ([`ButtonAttributes`]);
//! the conductor turns them into a typed [`ActionButton`] and works on that
//! instead of on the visual element.
//!
//! The displayed label is derived from the status, so the two can only change
//! together.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::status::ButtonStatus;

/// Element identifier of a button, unique within a page
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ButtonId(pub String);

impl ButtonId {
    /// Create a button ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ButtonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an author, local or hosted on a remote node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub Uuid);

impl AuthorId {
    /// Parse an author ID from its hyphenated or simple UUID form
    ///
    /// # Errors
    ///
    /// Returns the UUID parse error for malformed input.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s.trim()).map(Self)
    }

    /// Get the inner UUID
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Data bound to a rendered button element, exactly as the markup carries it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonAttributes {
    /// Element identifier, also used to find the button after an action
    pub id: String,
    /// Status wire string (`follow`, `unfollow`, ...)
    pub status: String,
    /// Target author identity
    pub uuid: String,
    /// Whether the target author lives on this node
    pub islocal: String,
    /// Target author's username (logging only)
    #[serde(default)]
    pub username: String,
}

impl ButtonAttributes {
    /// Convenience constructor, mostly for tests and page files
    pub fn new(
        id: impl Into<String>,
        status: impl Into<String>,
        uuid: impl Into<String>,
        is_local: bool,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            uuid: uuid.into(),
            islocal: if is_local { "true" } else { "false" }.to_string(),
            username: username.into(),
        }
    }
}

/// Why a set of attributes could not become an action button
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The element has no identifier
    #[error("button has an empty id")]
    MissingId,

    /// The status is not one the state machine knows
    #[error("button {id} has unrecognized status {status:?}")]
    UnrecognizedStatus {
        /// Button identifier
        id: String,
        /// The rejected status value
        status: String,
    },

    /// The target identity is not a UUID
    #[error("button {id} has malformed target uuid {uuid:?}")]
    InvalidTarget {
        /// Button identifier
        id: String,
        /// The rejected identity
        uuid: String,
    },

    /// The locality flag is not a boolean
    #[error("button {id} has non-boolean islocal {value:?}")]
    InvalidLocality {
        /// Button identifier
        id: String,
        /// The rejected flag
        value: String,
    },
}

/// Request lifecycle of a single button
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonPhase {
    /// Ready for a click
    #[default]
    Idle,
    /// An action is in flight; further clicks are ignored
    Pending,
    /// The last action failed; status and label are unchanged
    Failed {
        /// Error shown next to the button
        reason: String,
    },
}

/// Typed view-model of one action button
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Element identifier
    pub id: ButtonId,
    /// Current relationship status
    pub status: ButtonStatus,
    /// Author the action applies to
    pub target: AuthorId,
    /// Whether the target author is hosted locally
    pub is_local: bool,
    /// Target author's username (logging only)
    pub username: String,
    /// Request lifecycle
    pub phase: ButtonPhase,
}

impl ActionButton {
    /// Create an idle button
    pub fn new(
        id: ButtonId,
        status: ButtonStatus,
        target: AuthorId,
        is_local: bool,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id,
            status,
            target,
            is_local,
            username: username.into(),
            phase: ButtonPhase::Idle,
        }
    }

    /// Build a button from the attributes bound to its element
    ///
    /// # Errors
    ///
    /// Fails on an empty id, an unrecognized status, a malformed target UUID,
    /// or a non-boolean locality flag.
    pub fn from_attributes(attrs: &ButtonAttributes) -> Result<Self, AttributeError> {
        if attrs.id.trim().is_empty() {
            return Err(AttributeError::MissingId);
        }

        let status =
            ButtonStatus::parse(&attrs.status).ok_or_else(|| AttributeError::UnrecognizedStatus {
                id: attrs.id.clone(),
                status: attrs.status.clone(),
            })?;

        let target = AuthorId::parse(&attrs.uuid).map_err(|_| AttributeError::InvalidTarget {
            id: attrs.id.clone(),
            uuid: attrs.uuid.clone(),
        })?;

        let is_local =
            parse_locality(&attrs.islocal).ok_or_else(|| AttributeError::InvalidLocality {
                id: attrs.id.clone(),
                value: attrs.islocal.clone(),
            })?;

        Ok(Self::new(
            ButtonId::new(attrs.id.clone()),
            status,
            target,
            is_local,
            attrs.username.clone(),
        ))
    }

    /// Label currently displayed for this button
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        self.status.label()
    }

    /// Whether an action for this button is in flight
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.phase == ButtonPhase::Pending
    }

    /// Mark an action as in flight
    pub fn mark_pending(&mut self) {
        self.phase = ButtonPhase::Pending;
    }

    /// Apply a successful action: advance the status (and with it the label)
    pub fn apply_success(&mut self) {
        self.status = self.status.next();
        self.phase = ButtonPhase::Idle;
    }

    /// Record a failed action without touching status or label
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.phase = ButtonPhase::Failed {
            reason: reason.into(),
        };
    }

    /// Clear a failure shown on the button
    ///
    /// Returns whether there was a failure to clear.
    pub fn clear_error(&mut self) -> bool {
        if matches!(self.phase, ButtonPhase::Failed { .. }) {
            self.phase = ButtonPhase::Idle;
            true
        } else {
            false
        }
    }
}

/// Parse the `islocal` attribute the way templates render booleans
fn parse_locality(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// The buttons of one rendered page, in render order
#[derive(Clone, Debug, Default)]
pub struct ButtonBoard {
    order: Vec<ButtonId>,
    buttons: HashMap<ButtonId, ActionButton>,
}

impl ButtonBoard {
    /// Create an empty board
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a button from attributes and place it on the board
    ///
    /// Loading an id that is already present replaces that button in place.
    ///
    /// # Errors
    ///
    /// Returns the attribute error; the board is unchanged.
    pub fn load(&mut self, attrs: &ButtonAttributes) -> Result<ButtonId, AttributeError> {
        let button = ActionButton::from_attributes(attrs)?;
        Ok(self.insert(button))
    }

    /// Place a button on the board
    pub fn insert(&mut self, button: ActionButton) -> ButtonId {
        let id = button.id.clone();
        if self.buttons.insert(id.clone(), button).is_none() {
            self.order.push(id.clone());
        }
        id
    }

    /// Get a button by id
    #[must_use]
    pub fn get(&self, id: &ButtonId) -> Option<&ActionButton> {
        self.buttons.get(id)
    }

    /// Get a mutable button by id
    pub fn get_mut(&mut self, id: &ButtonId) -> Option<&mut ActionButton> {
        self.buttons.get_mut(id)
    }

    /// Whether a button with this id is on the board
    #[must_use]
    pub fn contains(&self, id: &ButtonId) -> bool {
        self.buttons.contains_key(id)
    }

    /// Buttons in render order
    pub fn iter(&self) -> impl Iterator<Item = &ActionButton> {
        self.order.iter().filter_map(|id| self.buttons.get(id))
    }

    /// Number of buttons
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the board has no buttons
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every button (page re-render or unload)
    pub fn remove_all(&mut self) {
        self.order.clear();
        self.buttons.clear();
    }
}
