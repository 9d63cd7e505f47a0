//! Daemon configuration loaded from TOML
//!
//! ```toml
//! selector_path = "/var/lib/loadmatrix/metric.txt"
//! i2c_bus = "/dev/i2c-1"
//! i2c_address = 0x70
//! brightness = 15
//! temperature = "thermal-zone"
//!
//! [worker]
//! tick_ms = 1000
//! mode_poll_ticks = 20
//! interface = "eth0"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use loadmatrix_core::Settings;
use serde::Deserialize;

use crate::ht16k33::{DEFAULT_I2C_ADDR, MAX_BRIGHTNESS};
use crate::temperature::{DEFAULT_THERMAL_ZONE, DEFAULT_VCGENCMD};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/loadmatrix.toml";

/// Where the board temperature comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureSource {
    #[default]
    ThermalZone,
    Vcgencmd,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PiConfig {
    /// Sampling and rendering settings shared with the simulator
    pub worker: Settings,

    /// Text file holding the selector value
    pub selector_path: PathBuf,

    pub i2c_bus: PathBuf,
    pub i2c_address: u8,

    /// HT16K33 dimming level, 0 to 15
    pub brightness: u8,

    pub temperature: TemperatureSource,
    pub thermal_zone: PathBuf,
    pub vcgencmd: PathBuf,
}

impl Default for PiConfig {
    fn default() -> Self {
        Self {
            worker: Settings::default(),
            selector_path: PathBuf::from("metric.txt"),
            i2c_bus: PathBuf::from("/dev/i2c-1"),
            i2c_address: DEFAULT_I2C_ADDR,
            brightness: MAX_BRIGHTNESS,
            temperature: TemperatureSource::default(),
            thermal_zone: PathBuf::from(DEFAULT_THERMAL_ZONE),
            vcgencmd: PathBuf::from(DEFAULT_VCGENCMD),
        }
    }
}

impl PiConfig {
    /// Loads configuration from `path`.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.worker
            .validate()
            .map_err(|e| anyhow!("Invalid [worker] settings: {}", e))?;
        if self.brightness > MAX_BRIGHTNESS {
            bail!(
                "brightness must be between 0 and {}, got {}",
                MAX_BRIGHTNESS,
                self.brightness
            );
        }
        Ok(())
    }
}
