//! Conductor Core - Headless Friend/Follow Button Controller for socknet
//!
//! This crate drives the relationship buttons rendered on socknet profile and
//! management pages (follow, unfollow, unfriend, accept friend request),
//! independent of whatever draws them. It can back a TUI, a CLI, or run
//! headless in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surfaces                           │
//! │      ┌─────────┐      ┌──────────┐      ┌──────────────┐      │
//! │      │   TUI   │      │   CLI    │      │   Headless   │      │
//! │      │(ratatui)│      │  (clap)  │      │   (tests)    │      │
//! │      └────┬────┘      └────┬─────┘      └──────┬───────┘      │
//! │           └────────────────┼───────────────────┘              │
//! │                  SurfaceEvent (up)                            │
//! │                  ButtonMessage (down)                         │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼─────────────────────────────────┐
//! │                     CONDUCTOR CORE                            │
//! │  ┌─────────────────────────┴──────────────────────────────┐   │
//! │  │                  ButtonController                      │   │
//! │  │  ┌────────────┐  ┌────────────┐  ┌──────────────────┐  │   │
//! │  │  │ButtonBoard │  │TokenSource │  │ FriendApi (HTTP) │  │   │
//! │  │  └────────────┘  └────────────┘  └──────────────────┘  │   │
//! │  └────────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # State Machine
//!
//! Each click sends the action named by the button's current status, and a
//! successful reply flips the status:
//!
//! ```text
//! follow  ⇄  unfollow          unfriend  ⇄  accept_friend_request
//! ```
//!
//! # Key Types
//!
//! - [`ButtonController`]: Owns the page's buttons and dispatches clicks
//! - [`ButtonStatus`]: What a button currently offers to do
//! - [`FriendActionRequest`]: The JSON body POSTed for each click
//! - [`FriendApi`]: Backend abstraction ([`HttpFriendApi`] by default)
//! - [`ButtonMessage`]: Messages sent from the controller to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to the controller
//!
//! # Quick Start
//!
//! ```ignore
//! use socknet_conductor::{
//!     load_config, ButtonAttributes, ButtonController, ButtonId, SurfaceEvent,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = load_config()?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let controller = ButtonController::with_http(
//!         settings.controller_config()?,
//!         settings.token_source(),
//!         tx,
//!     )?;
//!
//!     controller
//!         .handle_event(SurfaceEvent::PageLoaded {
//!             buttons: vec![ButtonAttributes::new(
//!                 "btn-1", "follow", "2f1b...", true, "dave",
//!             )],
//!         })
//!         .await?;
//!     controller.click(&ButtonId::new("btn-1")).await;
//!
//!     while let Some(msg) = rx.recv().await {
//!         // Redraw the button described by msg
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`status`]: Button statuses and the actions they send
//! - [`button`]: Button identity, attributes, and the page board
//! - [`payload`]: Request body wire format
//! - [`csrf`]: Anti-forgery token sources
//! - [`endpoint`]: Page URLs actions are POSTed to
//! - [`backend`]: Social backend abstraction (HTTP)
//! - [`controller`]: Click handling and state transitions
//! - [`events`]: Events from UI surfaces to the controller
//! - [`messages`]: Messages from the controller to UI surfaces
//! - [`render`]: Surface-agnostic button views
//! - [`config`]: TOML/env/CLI configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod button;
pub mod config;
pub mod controller;
pub mod csrf;
pub mod endpoint;
pub mod events;
pub mod messages;
pub mod payload;
pub mod render;
pub mod status;

// Re-exports for convenience
pub use backend::{ActionResponse, ApiError, FriendApi, HttpFriendApi};
pub use button::{
    ActionButton, AttributeError, AuthorId, ButtonAttributes, ButtonBoard, ButtonId, ButtonPhase,
};
pub use controller::{
    ActionFailure, ActionResult, ActionSuccess, ButtonController, ClickOutcome, ControllerConfig,
    IgnoreReason, PendingAction,
};
pub use csrf::{CookieHeaderToken, CsrfToken, NoToken, StaticToken, TokenSource};
pub use endpoint::{Endpoint, EndpointKind};
pub use events::SurfaceEvent;
pub use messages::ButtonMessage;
pub use payload::{AuthorRef, FriendActionRequest, FriendRef};
pub use render::ButtonView;
pub use status::{ButtonStatus, FriendAction};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConductorSettings, ConfigError,
    ConfigOverrides, ConfigSource, SocknetToml,
};
