//! Hardware-independent core library for loadmatrix
//!
//! This crate contains all platform-agnostic logic for the loadmatrix host
//! monitor: metric mode selection, per-metric sampling with rolling history and
//! counter deltas, 8x8 frame rendering, and the background worker that ties
//! them together.
//!
//! The LED driver, the OS metrics provider, the temperature sensor and the
//! mode selector source are capabilities expressed as traits, so the same core
//! runs on a Raspberry Pi and inside the desktop simulator (and in tests).

pub mod animation;
pub mod config;
pub mod delta;
pub mod display;
pub mod frame;
pub mod history;
pub mod mode;
pub mod render;
pub mod sampler;
pub mod selector;
pub mod sensors;
pub mod worker;

pub use config::{ConfigError, ScaleBounds, Settings};
pub use display::MatrixDisplay;
pub use frame::Frame;
pub use mode::{FileModeSource, Mode, ModeSource};
pub use sensors::{LoadAverage, MetricsProvider, NetCounters, SensorError, TemperatureSensor};
pub use worker::{StopHandle, Worker, WorkerError, WorkerHandle, WorkerState};
