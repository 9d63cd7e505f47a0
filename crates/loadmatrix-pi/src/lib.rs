//! Raspberry Pi backend for loadmatrix
//!
//! Supplies the hardware capabilities the core worker needs on a Pi: an
//! HT16K33 8x8 backpack on I2C, `sysinfo` host metrics and a board
//! temperature sensor, plus the daemon's TOML configuration.

pub mod config;
pub mod ht16k33;
pub mod metrics;
pub mod temperature;

pub use config::{PiConfig, TemperatureSource};
pub use ht16k33::Ht16k33;
pub use metrics::SysinfoProvider;
pub use temperature::{ThermalZoneSensor, VcgencmdSensor};
