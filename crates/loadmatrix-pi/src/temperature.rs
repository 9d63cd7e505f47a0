//! Board temperature sources
//!
//! Both sensors report failures as [`SensorError`]; the sampler turns them
//! into a 0 reading so a missing sensor never stops the display.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use loadmatrix_core::{SensorError, TemperatureSensor};

/// Default sysfs node for the SoC temperature
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Default location of the VideoCore tool on Raspberry Pi OS
pub const DEFAULT_VCGENCMD: &str = "/opt/vc/bin/vcgencmd";

// =============================================================================
// sysfs thermal zone
// =============================================================================

/// Reads a sysfs thermal zone, which reports millidegrees Celsius.
#[derive(Debug, Clone)]
pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl ThermalZoneSensor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ThermalZoneSensor {
    fn default() -> Self {
        Self::new(DEFAULT_THERMAL_ZONE)
    }
}

impl TemperatureSensor for ThermalZoneSensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            debug!("Reading {} failed: {}", self.path.display(), e);
            SensorError::ReadFailed {
                sensor: "thermal_zone",
                operation: "read temperature file",
                details: "file missing or unreadable",
            }
        })?;

        let millidegrees: i32 = contents.trim().parse().map_err(|_| SensorError::InvalidData {
            sensor: "thermal_zone",
            details: "temperature is not an integer",
        })?;
        Ok(millidegrees as f32 / 1000.0)
    }
}

// =============================================================================
// vcgencmd
// =============================================================================

/// Runs `vcgencmd measure_temp` and parses `temp=48.3'C`.
#[derive(Debug, Clone)]
pub struct VcgencmdSensor {
    program: PathBuf,
}

impl VcgencmdSensor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for VcgencmdSensor {
    fn default() -> Self {
        Self::new(DEFAULT_VCGENCMD)
    }
}

impl TemperatureSensor for VcgencmdSensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let output = Command::new(&self.program)
            .arg("measure_temp")
            .output()
            .map_err(|e| {
                debug!("Running {} failed: {}", self.program.display(), e);
                SensorError::ReadFailed {
                    sensor: "vcgencmd",
                    operation: "spawn measure_temp",
                    details: "command not found or not executable",
                }
            })?;

        if !output.status.success() {
            debug!("{} exited with {}", self.program.display(), output.status);
            return Err(SensorError::ReadFailed {
                sensor: "vcgencmd",
                operation: "measure_temp",
                details: "command exited with an error",
            });
        }

        parse_measure_temp(&String::from_utf8_lossy(&output.stdout)).ok_or(
            SensorError::InvalidData {
                sensor: "vcgencmd",
                details: "expected output like temp=48.3'C",
            },
        )
    }
}

/// Parse `temp=48.3'C` into degrees.
pub fn parse_measure_temp(output: &str) -> Option<f32> {
    let (_, value) = output.trim().split_once('=')?;
    value.trim_end_matches("'C").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_measure_temp() {
        assert_eq!(parse_measure_temp("temp=48.3'C\n"), Some(48.3));
        assert_eq!(parse_measure_temp("temp=0.0'C"), Some(0.0));
        assert_eq!(parse_measure_temp("error=1 error_msg=\"bad\""), None);
        assert_eq!(parse_measure_temp(""), None);
    }

    #[test]
    fn test_thermal_zone_millidegrees() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp");
        fs::write(&path, "48312\n").unwrap();

        let mut sensor = ThermalZoneSensor::new(&path);
        assert_eq!(sensor.read_celsius(), Ok(48.312));
    }

    #[test]
    fn test_thermal_zone_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sensor = ThermalZoneSensor::new(dir.path().join("absent"));
        assert!(matches!(
            sensor.read_celsius(),
            Err(SensorError::ReadFailed { sensor: "thermal_zone", .. })
        ));
    }

    #[test]
    fn test_thermal_zone_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp");
        fs::write(&path, "hot").unwrap();

        let mut sensor = ThermalZoneSensor::new(&path);
        assert!(matches!(
            sensor.read_celsius(),
            Err(SensorError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_vcgencmd_missing_binary() {
        let mut sensor = VcgencmdSensor::new("/nonexistent/vcgencmd");
        assert!(matches!(
            sensor.read_celsius(),
            Err(SensorError::ReadFailed { sensor: "vcgencmd", .. })
        ));
    }
}
