//! socknet TUI - Terminal surface for friend/follow buttons
//!
//! This crate lists the buttons of a page and lets the user click them from
//! the keyboard. All relationship logic lives in `socknet-conductor`; the TUI
//! only turns keys into clicks and redraws what the controller reports.
//!
//! # Architecture
//!
//! - **App**: Event loop and rendering
//! - **Display**: Button rows derived from controller messages
//! - **Page**: Page files standing in for a rendered profile page

pub mod app;
pub mod display;
pub mod page;
pub mod theme;

pub use app::App;
