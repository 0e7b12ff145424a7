//! Shared rendering for the K9 walk-log status display.
//!
//! This crate contains the platform-agnostic half of the display subsystem:
//! everything needed to turn a stats snapshot or a notification into a
//! finished [`Frame`], with no knowledge of threads, clocks or devices.
//!
//! - [`colors`]: Monochrome color constants for the OLED panel
//! - [`config`]: Panel size and pre-computed layout positions
//! - [`styles`]: Pre-computed text styles
//! - [`frame`]: 1-bit framebuffer implementing `DrawTarget`
//! - [`stats`]: Immutable stats snapshot shown on the screens
//! - [`notification`]: Overlay kinds raised by business events
//! - [`screens`]: Rotating screens and their fixed order
//! - [`widgets`]: Header, footer, popup and text-wrapping helpers
//! - [`render`]: Entry points producing whole frames
//!
//! # Testing
//!
//! Render functions are pure, so tests feed canned snapshots and compare
//! frames directly:
//! ```bash
//! cargo test -p k9-display-common
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod frame;
pub mod notification;
pub mod render;
pub mod screens;
pub mod stats;
pub mod styles;
pub mod widgets;

// Re-export commonly used items
pub use frame::Frame;
pub use notification::NotificationKind;
pub use render::render_notification;
pub use screens::{DisplayClock, Screen, ScreenSet};
pub use stats::{BalanceStanding, StatsSnapshot};
