//! Status display subsystem for the K9 walk-log bot.
//!
//! A background thread rotates a small OLED panel through four screens
//! (status, balance, statistics, date and time) and briefly replaces the
//! rotation with a popup whenever the bot records something worth showing.
//!
//! # Module Organization
//!
//! - [`config`]: Runtime settings loaded from TOML, validated at start
//! - [`error`]: Error type shared by the whole crate
//! - [`stats`]: Stats source trait and the TTL cache in front of it
//! - [`notifications`]: Last-write-wins notification slot
//! - [`surface`]: Output devices (null, ASCII preview, SSD1306)
//! - `oled`: SSD1306 driver over Linux I2C (`hardware` feature)
//! - [`scheduler`]: Tick loop and per-tick algorithm
//! - [`manager`]: [`DisplayManager`] facade used by the rest of the bot
//! - [`ledger`]: In-memory ledger for running without the bot's database
//!
//! Frame rendering itself lives in the `k9-display-common` crate, which has
//! no threads, clocks or devices and is tested with canned snapshots.
//!
//! # Usage
//!
//! ```ignore
//! let manager = DisplayManager::new(DisplayConfig::default(), ledger);
//! manager.start()?;
//! manager.notify(NotificationKind::WalkAdded, "Walk #12: +75 MDL");
//! // ...
//! manager.stop();
//! ```

// Crate-level lints
#![allow(clippy::cast_possible_truncation)] // Duration millis -> u64 for logging

pub mod config;
pub mod error;
pub mod ledger;
pub mod manager;
pub mod notifications;
pub mod scheduler;
#[cfg(feature = "hardware")]
pub mod oled;
pub mod stats;
pub mod surface;

pub use config::{DeviceConfig, DeviceKind, DisplayConfig};
pub use error::{DisplayError, Result};
pub use k9_display_common::{NotificationKind, Screen, StatsSnapshot};
pub use manager::DisplayManager;
pub use scheduler::MetricsSnapshot;
pub use stats::{AggregateStats, StatsCache, StatsSource};
