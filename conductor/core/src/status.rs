//! Button Status State Machine
//!
//! Every friend/follow button carries a status that decides which action a
//! click sends and what the button displays. A successful action moves the
//! button to the next status:
//!
//! ```text
//!   follow  ──follow──▶  unfollow  ──unfollow──▶  follow
//!   unfriend ──unfriend──▶ accept_friend_request ──accept_friend_request──▶ unfriend
//! ```
//!
//! There is no terminal state; the machine cycles as the user toggles the
//! relationship.

use serde::{Deserialize, Serialize};

/// Status bound to a rendered action button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStatus {
    /// Not following the author yet
    Follow,
    /// Following the author
    Unfollow,
    /// Friends with the author
    Unfriend,
    /// The author has a pending friend request for us
    AcceptFriendRequest,
}

impl ButtonStatus {
    /// Every recognized status, in display order
    pub const ALL: [ButtonStatus; 4] = [
        Self::Follow,
        Self::Unfollow,
        Self::Unfriend,
        Self::AcceptFriendRequest,
    ];

    /// Parse a status from its wire string.
    ///
    /// Only the exact wire strings are recognized. Anything else returns
    /// `None`, and a click on such a button must not send a request.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "follow" => Some(Self::Follow),
            "unfollow" => Some(Self::Unfollow),
            "unfriend" => Some(Self::Unfriend),
            "accept_friend_request" => Some(Self::AcceptFriendRequest),
            _ => None,
        }
    }

    /// Wire string for this status
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::Unfriend => "unfriend",
            Self::AcceptFriendRequest => "accept_friend_request",
        }
    }

    /// The action a click on a button in this status requests
    #[must_use]
    pub fn action(&self) -> FriendAction {
        match self {
            Self::Follow => FriendAction::Follow,
            Self::Unfollow => FriendAction::Unfollow,
            Self::Unfriend => FriendAction::Unfriend,
            Self::AcceptFriendRequest => FriendAction::AcceptFriendRequest,
        }
    }

    /// Status after the action for this status succeeded
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Self::Unfriend => Self::AcceptFriendRequest,
            Self::Follow => Self::Unfollow,
            Self::Unfollow => Self::Follow,
            Self::AcceptFriendRequest => Self::Unfriend,
        }
    }

    /// Human-readable label shown on a button in this status
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Follow => "Follow",
            Self::Unfollow => "Unfollow",
            Self::Unfriend => "Unfriend",
            Self::AcceptFriendRequest => "Accept Friend Request",
        }
    }
}

impl std::fmt::Display for ButtonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action submitted to the backend in the request's `action` field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendAction {
    /// Start following an author
    Follow,
    /// Stop following an author
    Unfollow,
    /// End a friendship
    Unfriend,
    /// Accept a pending friend request
    AcceptFriendRequest,
}

impl FriendAction {
    /// Wire string for this action
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::Unfriend => "unfriend",
            Self::AcceptFriendRequest => "accept_friend_request",
        }
    }
}

impl std::fmt::Display for FriendAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
