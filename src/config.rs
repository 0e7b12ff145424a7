//! Display subsystem configuration.
//!
//! Values only: where they come from (env, file, chat command) is the
//! caller's business. [`DisplayConfig::load`] and
//! [`DisplayConfig::from_toml_str`] cover the common case of a TOML file:
//!
//! ```toml
//! enabled = true
//! tick_interval_ms = 10000
//! stats_ttl_ms = 30000
//! stale_ceiling_ms = 300000
//! notification_ms = 15000
//!
//! [device]
//! kind = "ssd1306"
//! i2c_bus = "/dev/i2c-1"
//! address = 0x3C
//! ```
//!
//! Out-of-range values are rejected by [`DisplayConfig::validate`], never
//! clamped.

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DisplayError, Result};

// =============================================================================
// Defaults and Limits
// =============================================================================

/// Default time between ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10_000;

/// Default stats cache time-to-live.
pub const DEFAULT_STATS_TTL_MS: u64 = 30_000;

/// Default hard ceiling on how old a fallback snapshot may be.
pub const DEFAULT_STALE_CEILING_MS: u64 = 300_000;

/// Default overlay duration. Longer than one tick so every notification is
/// seen at least once.
pub const DEFAULT_NOTIFICATION_MS: u64 = 15_000;

/// Common I2C address for SSD1306 modules.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;

const TICK_RANGE_MS: RangeInclusive<u64> = 100..=3_600_000;
const TTL_RANGE_MS: RangeInclusive<u64> = 100..=86_400_000;
const NOTIFICATION_RANGE_MS: RangeInclusive<u64> = 100..=600_000;
/// Valid 7-bit addresses outside the reserved blocks.
const I2C_ADDRESS_RANGE: RangeInclusive<u8> = 0x03..=0x77;

// =============================================================================
// Config Types
// =============================================================================

/// Which render surface to drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// SSD1306 OLED over Linux I2C (needs the `hardware` feature).
    #[default]
    Ssd1306,
    /// ASCII preview in the debug log.
    Preview,
    /// Headless: frames are rendered and dropped.
    None,
}

/// Output device settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub kind: DeviceKind,
    pub i2c_bus: String,
    pub address: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            kind: DeviceKind::default(),
            i2c_bus: "/dev/i2c-1".to_string(),
            address: DEFAULT_I2C_ADDRESS,
        }
    }
}

/// Scheduler, cache and device settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// When `false`, `start()` succeeds without running anything.
    pub enabled: bool,
    pub tick_interval_ms: u64,
    pub stats_ttl_ms: u64,
    pub stale_ceiling_ms: u64,
    pub notification_ms: u64,
    pub device: DeviceConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            stats_ttl_ms: DEFAULT_STATS_TTL_MS,
            stale_ceiling_ms: DEFAULT_STALE_CEILING_MS,
            notification_ms: DEFAULT_NOTIFICATION_MS,
            device: DeviceConfig::default(),
        }
    }
}

impl DisplayConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| DisplayError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration { Duration::from_millis(self.tick_interval_ms) }

    #[inline]
    pub fn stats_ttl(&self) -> Duration { Duration::from_millis(self.stats_ttl_ms) }

    #[inline]
    pub fn stale_ceiling(&self) -> Duration { Duration::from_millis(self.stale_ceiling_ms) }

    #[inline]
    pub fn notification_duration(&self) -> Duration { Duration::from_millis(self.notification_ms) }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        check_range("tick_interval_ms", self.tick_interval_ms, &TICK_RANGE_MS)?;
        check_range("stats_ttl_ms", self.stats_ttl_ms, &TTL_RANGE_MS)?;
        check_range("notification_ms", self.notification_ms, &NOTIFICATION_RANGE_MS)?;

        if self.stale_ceiling_ms < self.stats_ttl_ms {
            return Err(DisplayError::ConfigInvalid {
                field: "stale_ceiling_ms",
                reason: format!(
                    "{} is below stats_ttl_ms ({})",
                    self.stale_ceiling_ms, self.stats_ttl_ms
                ),
            });
        }

        if self.device.kind == DeviceKind::Ssd1306 {
            if !I2C_ADDRESS_RANGE.contains(&self.device.address) {
                return Err(DisplayError::ConfigInvalid {
                    field: "device.address",
                    reason: format!("{:#04x} is not a 7-bit I2C address", self.device.address),
                });
            }
            if self.device.i2c_bus.trim().is_empty() {
                return Err(DisplayError::ConfigInvalid {
                    field: "device.i2c_bus",
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: u64,
    range: &RangeInclusive<u64>,
) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(DisplayError::ConfigInvalid {
        field,
        reason: format!("{value} is outside {}..={}", range.start(), range.end()),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DisplayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_secs(10));
        assert_eq!(config.stats_ttl(), Duration::from_secs(30));
        assert_eq!(config.device.address, 0x3C);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = DisplayConfig::from_toml_str(
            r#"
            tick_interval_ms = 5000

            [device]
            kind = "preview"
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_interval_ms, 5000);
        assert_eq!(config.stats_ttl_ms, DEFAULT_STATS_TTL_MS);
        assert_eq!(config.device.kind, DeviceKind::Preview);
        assert_eq!(config.device.i2c_bus, "/dev/i2c-1");
    }

    #[test]
    fn test_parse_error() {
        let err = DisplayConfig::from_toml_str("tick_interval_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, DisplayError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enabled = false\nnotification_ms = 2000").unwrap();
        let config = DisplayConfig::load(file.path()).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.notification_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = DisplayConfig {
            tick_interval_ms: 0,
            ..DisplayConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DisplayError::ConfigInvalid { field: "tick_interval_ms", .. }));
    }

    #[test]
    fn test_rejects_ceiling_below_ttl() {
        let config = DisplayConfig {
            stats_ttl_ms: 60_000,
            stale_ceiling_ms: 30_000,
            ..DisplayConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DisplayError::ConfigInvalid { field: "stale_ceiling_ms", .. }));
    }

    #[test]
    fn test_rejects_reserved_address() {
        let mut config = DisplayConfig::default();
        config.device.address = 0x78;
        assert!(config.validate().is_err());

        // Address is irrelevant without a physical device
        config.device.kind = DeviceKind::None;
        assert!(config.validate().is_ok());
    }
}
