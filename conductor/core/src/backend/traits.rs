//! Friend API Traits
//!
//! Trait definitions for the social backend that receives friend actions.
//! The controller only depends on [`FriendApi`], so the HTTP client can be
//! swapped for a test double or another transport without touching the state
//! machine.

use async_trait::async_trait;
use thiserror::Error;

use crate::csrf::CsrfToken;
use crate::payload::FriendActionRequest;

/// Successful reply to a friend action
///
/// The reply body does not drive the button transition; any 2xx is success.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionResponse {
    /// HTTP status code
    pub status: u16,
    /// Pending friend request count, when the page reports one
    pub pending_requests: Option<u32>,
}

impl ActionResponse {
    /// Build a response from a status code and raw body
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        Self {
            status,
            pending_requests: body.trim().parse().ok(),
        }
    }
}

/// Why a friend action did not succeed
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The HTTP client could not be built
    #[error("invalid client configuration: {0}")]
    Client(String),
}

impl ApiError {
    /// Short text suitable for display next to a button
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Status { status, .. } => format!("Request rejected ({status})"),
            Self::Transport(_) => "Could not reach the server".to_string(),
            Self::Client(_) => "Client misconfigured".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Backend that accepts friend actions
///
/// Implement this trait to deliver actions over a different transport.
#[async_trait]
pub trait FriendApi: Send + Sync {
    /// Backend name for logs (e.g., "HTTP")
    fn name(&self) -> &str;

    /// Submit one action
    ///
    /// `csrf` is attached as the anti-forgery header when present; without it
    /// the request is still sent.
    async fn submit(
        &self,
        request: &FriendActionRequest,
        csrf: Option<&CsrfToken>,
    ) -> Result<ActionResponse, ApiError>;
}
