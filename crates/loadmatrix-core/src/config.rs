//! Worker settings and per-metric scale bounds
//!
//! Every value has a default matching the stock deployment (1 s tick, mode
//! file polled every 20 ticks, `eth0`, load scaled by 16), so an empty config
//! file is a valid config.

use core::time::Duration;

use serde::Deserialize;
use thiserror_no_std::Error;

use crate::frame::MATRIX_SIZE;

/// Nominal tick length in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Ticks between mode selector reads
pub const DEFAULT_MODE_POLL_TICKS: u32 = 20;

/// Interface whose byte counters feed the network modes
pub const DEFAULT_INTERFACE: &str = "eth0";

/// Fill pixels per unit of 1-minute load average.
///
/// 16 maps a load of 4.0 onto the full 64-pixel grid, i.e. one fully busy
/// quad-core board.
pub const DEFAULT_LOAD_FILL_FACTOR: f32 = 16.0;

/// Linear scale from a raw metric value onto the 8-pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    /// Degrees Celsius
    pub const TEMPERATURE: Self = Self::new(0.0, 85.0);
    /// Percentages (CPU, memory)
    pub const PERCENT: Self = Self::new(0.0, 100.0);
    /// Bytes per second on the charted interface
    pub const NETWORK: Self = Self::new(0.0, 10_000.0);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn span(self) -> f32 {
        self.max - self.min
    }

    /// Scale `value` into a pixel height: `round(value * 8 / (max - min))`.
    ///
    /// The result is not clamped. Values outside `[min, max]` yield heights
    /// outside `0..=8`, which the frame clips at its edge.
    pub fn pixel_height(self, value: f32) -> i32 {
        (value * MATRIX_SIZE as f32 / self.span()).round() as i32
    }
}

/// Worker configuration shared by every deployment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Nominal tick length in milliseconds
    pub tick_ms: u64,
    /// Re-read the mode selector every this many ticks
    pub mode_poll_ticks: u32,
    /// Network interface charted by the network and multi-metric modes
    pub interface: String,
    /// Multiplier turning the load average into a fill count
    pub load_fill_factor: f32,
    pub temperature: ScaleBounds,
    /// Temperature scale for the single column of the multi-metric frame
    pub multi_temperature: ScaleBounds,
    pub cpu: ScaleBounds,
    pub memory: ScaleBounds,
    pub network: ScaleBounds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            mode_poll_ticks: DEFAULT_MODE_POLL_TICKS,
            interface: DEFAULT_INTERFACE.into(),
            load_fill_factor: DEFAULT_LOAD_FILL_FACTOR,
            temperature: ScaleBounds::TEMPERATURE,
            multi_temperature: ScaleBounds::PERCENT,
            cpu: ScaleBounds::PERCENT,
            memory: ScaleBounds::PERCENT,
            network: ScaleBounds::NETWORK,
        }
    }
}

impl Settings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Reject settings the worker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode_poll_ticks == 0 {
            return Err(ConfigError::ZeroPollCadence);
        }
        if self.load_fill_factor.is_nan() || self.load_fill_factor < 0.0 {
            return Err(ConfigError::NegativeFillFactor);
        }

        let scales = [
            ("temperature", self.temperature),
            ("multi_temperature", self.multi_temperature),
            ("cpu", self.cpu),
            ("memory", self.memory),
            ("network", self.network),
        ];
        for (metric, bounds) in scales {
            let span = bounds.span();
            if span.is_nan() || span <= 0.0 {
                return Err(ConfigError::EmptyScale { metric });
            }
        }

        Ok(())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("mode_poll_ticks must be at least 1")]
    ZeroPollCadence,
    #[error("load_fill_factor must be a non-negative number")]
    NegativeFillFactor,
    #[error("scale for {metric} must have max greater than min")]
    EmptyScale { metric: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_height_rounds() {
        let cpu = ScaleBounds::PERCENT;
        assert_eq!(cpu.pixel_height(0.0), 0);
        assert_eq!(cpu.pixel_height(6.0), 0); // 0.48
        assert_eq!(cpu.pixel_height(6.25), 1); // 0.5 rounds away from zero
        assert_eq!(cpu.pixel_height(50.0), 4);
        assert_eq!(cpu.pixel_height(100.0), 8);
    }

    #[test]
    fn test_pixel_height_is_not_clamped() {
        assert_eq!(ScaleBounds::PERCENT.pixel_height(150.0), 12);
        assert_eq!(ScaleBounds::PERCENT.pixel_height(-25.0), -2);
        assert_eq!(ScaleBounds::TEMPERATURE.pixel_height(85.0), 8);
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.tick(), Duration::from_secs(1));
        assert_eq!(settings.mode_poll_ticks, 20);
        assert_eq!(settings.interface, "eth0");
        assert_eq!(settings.temperature, ScaleBounds::TEMPERATURE);
        assert_eq!(settings.multi_temperature, ScaleBounds::new(0.0, 100.0));
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            mode_poll_ticks: 0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::ZeroPollCadence));

        let settings = Settings {
            load_fill_factor: -1.0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::NegativeFillFactor));

        let settings = Settings {
            memory: ScaleBounds::new(50.0, 50.0),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::EmptyScale { metric: "memory" })
        );

        let settings = Settings {
            multi_temperature: ScaleBounds::new(100.0, 0.0),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::EmptyScale {
                metric: "multi_temperature"
            })
        );
    }
}
