//! HTTP Friend API
//!
//! Delivers friend actions the way the site's pages expect them: a JSON POST
//! flagged as an AJAX request, carrying the anti-forgery token header.
//!
//! # Headers
//!
//! - `Content-Type: application/json`
//! - `X-CSRFToken: <token>` when a token is available
//! - `X-Requested-With: XMLHttpRequest`; the page views answer non-AJAX
//!   posts with a 500
//!
//! No timeout is applied unless one is configured, and nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::traits::{ActionResponse, ApiError, FriendApi};
use crate::csrf::CsrfToken;
use crate::payload::FriendActionRequest;

/// Header carrying the anti-forgery token
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Header marking the request as AJAX
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// HTTP backend client
#[derive(Clone)]
pub struct HttpFriendApi {
    /// Endpoint URL every action is POSTed to
    url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpFriendApi {
    /// Create a client posting to `url`
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url: url.into(),
            http_client: builder.build()?,
        })
    }

    /// Endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FriendApi for HttpFriendApi {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn submit(
        &self,
        request: &FriendActionRequest,
        csrf: Option<&CsrfToken>,
    ) -> Result<ActionResponse, ApiError> {
        let mut builder = self
            .http_client
            .post(&self.url)
            .header(REQUESTED_WITH_HEADER, "XMLHttpRequest")
            .json(request);

        if let Some(token) = csrf {
            builder = builder.header(CSRF_HEADER, token.as_str());
        }

        debug!(url = %self.url, action = %request.action, "Posting friend action");

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ActionResponse::from_body(status.as_u16(), &body))
    }
}
