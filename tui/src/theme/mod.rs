//! Theme and Colors

use ratatui::style::Color;

/// Title and selection accent
pub const ACCENT: Color = Color::Magenta;

/// Follow / accept actions
pub const ACTION_GREEN: Color = Color::Rgb(120, 230, 120);

/// Unfollow / unfriend actions
pub const ACTION_AMBER: Color = Color::Rgb(255, 190, 90);

/// Pending rows and hints
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);
