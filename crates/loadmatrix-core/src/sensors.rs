//! Metric source capabilities consumed by the sampler
//!
//! The OS metrics provider is assumed to always answer; only the temperature
//! sensor is allowed to fail, and [`read_or_zero`] maps that failure to 0.

use core::time::Duration;

use log::debug;
use thiserror_no_std::Error;

/// System load averages over 1, 5 and 15 minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f32,
    pub five: f32,
    pub fifteen: f32,
}

/// Cumulative byte counters for one network interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl NetCounters {
    pub const fn new(bytes_in: u64, bytes_out: u64) -> Self {
        Self {
            bytes_in,
            bytes_out,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: failed to {operation}: {details}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: invalid reading: {details}")]
    InvalidData {
        sensor: &'static str,
        details: &'static str,
    },
}

/// Host metrics provider.
pub trait MetricsProvider {
    /// Per-core CPU utilisation in percent, measured over `window`.
    ///
    /// Blocks for the whole window; this is the tick source for the modes
    /// that use it.
    fn cpu_percent_per_core(&mut self, window: Duration) -> Vec<f32>;

    /// Aggregate CPU utilisation in percent since the previous call.
    fn cpu_percent(&mut self) -> f32;

    fn load_average(&mut self) -> LoadAverage;

    /// Cumulative counters for `interface`.
    fn net_counters(&mut self, interface: &str) -> NetCounters;

    /// Used memory in percent of total.
    fn memory_percent(&mut self) -> f32;
}

/// Board temperature sensor, in degrees Celsius.
pub trait TemperatureSensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for Box<T> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        (**self).read_celsius()
    }
}

impl<P: MetricsProvider + ?Sized> MetricsProvider for Box<P> {
    fn cpu_percent_per_core(&mut self, window: Duration) -> Vec<f32> {
        (**self).cpu_percent_per_core(window)
    }

    fn cpu_percent(&mut self) -> f32 {
        (**self).cpu_percent()
    }

    fn load_average(&mut self) -> LoadAverage {
        (**self).load_average()
    }

    fn net_counters(&mut self, interface: &str) -> NetCounters {
        (**self).net_counters(interface)
    }

    fn memory_percent(&mut self) -> f32 {
        (**self).memory_percent()
    }
}

/// Read the temperature, substituting 0 when the sensor is unavailable.
pub fn read_or_zero<T: TemperatureSensor + ?Sized>(sensor: &mut T) -> f32 {
    match sensor.read_celsius() {
        Ok(celsius) => celsius,
        Err(e) => {
            debug!("Temperature unavailable, using 0: {}", e);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<f32, SensorError>);

    impl TemperatureSensor for Fixed {
        fn read_celsius(&mut self) -> Result<f32, SensorError> {
            self.0
        }
    }

    #[test]
    fn test_read_or_zero_passes_reading_through() {
        assert_eq!(read_or_zero(&mut Fixed(Ok(48.3))), 48.3);
    }

    #[test]
    fn test_read_or_zero_swallows_failure() {
        let mut sensor = Fixed(Err(SensorError::ReadFailed {
            sensor: "vcgencmd",
            operation: "run measure_temp",
            details: "command not found",
        }));
        assert_eq!(read_or_zero(&mut sensor), 0.0);
    }

    #[test]
    fn test_boxed_sensor_delegates() {
        let mut sensor: Box<dyn TemperatureSensor> = Box::new(Fixed(Ok(51.0)));
        assert_eq!(read_or_zero(&mut sensor), 51.0);
    }
}
