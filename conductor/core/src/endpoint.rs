//! Action Endpoints
//!
//! The site accepts friend actions as AJAX POSTs on the page that rendered
//! the button:
//!
//! | Page | Path |
//! |---|---|
//! | Profile | `/profile/<uuid>/` |
//! | Manage friends | `/friends/<uuid>/` |
//! | Manage following | `/following/<uuid>/` |
//! | Friend requests | `/friend_requests/<uuid>/` |
//!
//! `<uuid>` is the page's author: the viewed profile, or the logged-in author
//! for the management pages. A fully qualified URL can be used instead.

use serde::{Deserialize, Serialize};

use crate::button::AuthorId;

/// Page an action is POSTed to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    /// An author's profile page
    Profile(AuthorId),
    /// The logged-in author's friend management page
    ManageFriends(AuthorId),
    /// The logged-in author's following page
    ManageFollowing(AuthorId),
    /// The logged-in author's pending friend requests page
    ManageFriendRequests(AuthorId),
    /// A fixed URL, used verbatim
    Url(String),
}

/// Page kind named in configuration, before an author is known
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// `/profile/<uuid>/`
    Profile,
    /// `/friends/<uuid>/`
    Friends,
    /// `/following/<uuid>/`
    Following,
    /// `/friend_requests/<uuid>/`
    FriendRequests,
}

impl EndpointKind {
    /// Parse a configured page kind
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "profile" => Some(Self::Profile),
            "friends" | "manage_friends" => Some(Self::Friends),
            "following" | "manage_following" => Some(Self::Following),
            "friend_requests" | "manage_friend_requests" => Some(Self::FriendRequests),
            _ => None,
        }
    }

    /// Bind the page kind to the page's author
    #[must_use]
    pub fn for_author(self, author: AuthorId) -> Endpoint {
        match self {
            Self::Profile => Endpoint::Profile(author),
            Self::Friends => Endpoint::ManageFriends(author),
            Self::Following => Endpoint::ManageFollowing(author),
            Self::FriendRequests => Endpoint::ManageFriendRequests(author),
        }
    }
}

impl Endpoint {
    /// Path segment for page endpoints
    fn page(&self) -> Option<(&'static str, &AuthorId)> {
        match self {
            Self::Profile(a) => Some(("profile", a)),
            Self::ManageFriends(a) => Some(("friends", a)),
            Self::ManageFollowing(a) => Some(("following", a)),
            Self::ManageFriendRequests(a) => Some(("friend_requests", a)),
            Self::Url(_) => None,
        }
    }

    /// Full URL of this endpoint under `base_url`
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        if let Self::Url(url) = self {
            return url.clone();
        }
        match self.page() {
            Some((segment, author)) => {
                format!("{}/{}/{}/", base_url.trim_end_matches('/'), segment, author)
            }
            None => base_url.to_string(),
        }
    }
}
