//! Friend Action Wire Format
//!
//! The JSON body POSTed for every action:
//!
//! ```json
//! {
//!   "action": "follow",
//!   "author": { "id": "<current user>" },
//!   "friend": { "id": "<target author>", "is_local": true }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::button::{ActionButton, AuthorId};
use crate::status::FriendAction;

/// The acting (logged-in) author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    /// Current user identity
    pub id: AuthorId,
}

/// The author the action applies to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRef {
    /// Target identity
    pub id: AuthorId,
    /// Whether the target is hosted on this node
    pub is_local: bool,
}

/// Body of a friend action request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendActionRequest {
    /// Requested action
    pub action: FriendAction,
    /// Acting author
    pub author: AuthorRef,
    /// Target author
    pub friend: FriendRef,
}

impl FriendActionRequest {
    /// Build a request from its parts
    #[must_use]
    pub fn new(action: FriendAction, author: AuthorId, target: AuthorId, is_local: bool) -> Self {
        Self {
            action,
            author: AuthorRef { id: author },
            friend: FriendRef {
                id: target,
                is_local,
            },
        }
    }

    /// Build the request a click on `button` sends on behalf of `author`
    #[must_use]
    pub fn for_button(button: &ActionButton, author: AuthorId) -> Self {
        Self::new(
            button.status.action(),
            author,
            button.target,
            button.is_local,
        )
    }
}
