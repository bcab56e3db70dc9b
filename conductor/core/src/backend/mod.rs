//! Social Backend Integration
//!
//! Friend actions are delivered through the [`FriendApi`] trait.
//!
//! # Available Backends
//!
//! - **HTTP**: AJAX-style POST to the site's page endpoint (default)
//!
//! # Usage
//!
//! ```ignore
//! use socknet_conductor::backend::{FriendApi, HttpFriendApi};
//!
//! let api = HttpFriendApi::new("http://localhost:8000/friends/<uuid>/", None)?;
//! let response = api.submit(&request, token.as_ref()).await?;
//! ```

mod http;
mod traits;

pub use http::HttpFriendApi;
pub use traits::{ActionResponse, ApiError, FriendApi};
