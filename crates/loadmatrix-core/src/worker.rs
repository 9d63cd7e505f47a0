//! Background worker: one frame per tick until asked to stop
//!
//! A [`Worker`] owns every capability it needs (metrics provider, temperature
//! sensor, display, mode source) and is consumed by [`Worker::start`], which
//! moves it onto a named thread and hands back a [`WorkerHandle`]. Stopping is
//! cooperative: the flag is checked between ticks, so the tick in progress
//! always finishes and the last frame written is a complete one.
//!
//! ```text
//! Worker --start--> Running --request_stop--> StopRequested --tick ends--> Stopped
//! ```
//!
//! The created state is the [`Worker`] value itself; [`WorkerHandle::state`]
//! reports the rest.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};
use thiserror_no_std::Error;

use crate::config::Settings;
use crate::display::{MatrixDisplay, show};
use crate::frame::Frame;
use crate::mode::{Mode, ModeSource};
use crate::render::FrameRenderer;
use crate::sampler::MetricSampler;
use crate::selector::ModeSelector;
use crate::sensors::{MetricsProvider, TemperatureSensor};

const THREAD_NAME: &str = "loadmatrix-worker";

/// Lifecycle of a started worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    StopRequested,
    Stopped,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("display write failed: {0}")]
    Display(String),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
    #[error("worker thread panicked")]
    Panicked,
}

// ============================================================================
// Per-tick pipeline
// ============================================================================

/// Selector, sampler and renderer: everything a tick needs except I/O.
#[derive(Debug, Clone)]
pub struct Pipeline {
    selector: ModeSelector,
    sampler: MetricSampler,
    renderer: FrameRenderer,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Self {
        Self {
            selector: ModeSelector::new(settings.mode_poll_ticks),
            sampler: MetricSampler::new(settings),
            renderer: FrameRenderer::new(settings),
        }
    }

    pub fn selector(&self) -> &ModeSelector {
        &self.selector
    }

    pub fn sampler(&self) -> &MetricSampler {
        &self.sampler
    }

    /// Pick the mode, sample it and render the frame for one tick.
    pub fn step<P, T, S>(&mut self, provider: &mut P, sensor: &mut T, source: &mut S) -> (Mode, Frame)
    where
        P: MetricsProvider + ?Sized,
        T: TemperatureSensor + ?Sized,
        S: ModeSource + ?Sized,
    {
        let mode = self.selector.on_tick(source);
        let sample = self.sampler.sample(mode, provider, sensor);
        (mode, self.renderer.render(&sample))
    }
}

// ============================================================================
// Worker
// ============================================================================

/// A configured worker that has not started yet.
pub struct Worker<P, T, D, S> {
    provider: P,
    sensor: T,
    display: D,
    source: S,
    settings: Settings,
    pipeline: Pipeline,
}

impl<P, T, D, S> Worker<P, T, D, S>
where
    P: MetricsProvider,
    T: TemperatureSensor,
    D: MatrixDisplay,
    S: ModeSource,
{
    pub fn new(provider: P, sensor: T, display: D, source: S, settings: Settings) -> Self {
        let pipeline = Pipeline::new(&settings);
        Self {
            provider,
            sensor,
            display,
            source,
            settings,
            pipeline,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the tick loop on the calling thread until `stop` is set.
    ///
    /// Returns the display so the caller can blank it after the worker is
    /// gone. A display write failure ends the loop with
    /// [`WorkerError::Display`].
    pub fn run(mut self, stop: &AtomicBool) -> Result<D, WorkerError> {
        let tick = self.settings.tick();
        let mut ticks: u64 = 0;
        info!(
            "Worker running: tick {:?}, mode poll every {} ticks, interface {}",
            tick,
            self.settings.mode_poll_ticks,
            self.settings.interface
        );

        while !stop.load(Ordering::Acquire) {
            let (mode, frame) =
                self.pipeline
                    .step(&mut self.provider, &mut self.sensor, &mut self.source);

            show(&mut self.display, &frame).map_err(|e| {
                error!("Display write failed on tick {}: {:?}", ticks + 1, e);
                WorkerError::Display(format!("{:?}", e))
            })?;
            ticks += 1;
            debug!("Tick {} ({}): {} pixels lit", ticks, mode.label(), frame.lit_count());

            if !mode.samples_over_tick() {
                thread::sleep(tick);
            }
        }

        info!("Worker stopped after {} ticks", ticks);
        Ok(self.display)
    }
}

impl<P, T, D, S> Worker<P, T, D, S>
where
    P: MetricsProvider + Send + 'static,
    T: TemperatureSensor + Send + 'static,
    D: MatrixDisplay + Send + 'static,
    S: ModeSource + Send + 'static,
{
    /// Move the worker onto its own thread.
    pub fn start(self) -> Result<WorkerHandle<D>, WorkerError> {
        let stop = StopHandle::new();
        let flag = stop.clone();

        let thread = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || self.run(&flag.0))
            .map_err(|e| WorkerError::Spawn(format!("{}", e)))?;

        info!("Worker thread started");
        Ok(WorkerHandle { stop, thread })
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Cloneable stop request, safe to move into a signal handler.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A running worker.
pub struct WorkerHandle<D> {
    stop: StopHandle,
    thread: JoinHandle<Result<D, WorkerError>>,
}

impl<D> WorkerHandle<D> {
    pub fn request_stop(&self) {
        if !self.stop.is_stop_requested() {
            info!("Worker stop requested");
        }
        self.stop.request_stop();
    }

    /// A stop handle that outlives borrows of this one.
    pub fn stopper(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> WorkerState {
        if self.thread.is_finished() {
            WorkerState::Stopped
        } else if self.stop.is_stop_requested() {
            WorkerState::StopRequested
        } else {
            WorkerState::Running
        }
    }

    /// Wait for the worker thread to exit and take back the display.
    ///
    /// Does not request a stop by itself.
    pub fn join(self) -> Result<D, WorkerError> {
        self.thread.join().map_err(|_| WorkerError::Panicked)?
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;
    use crate::sensors::{LoadAverage, NetCounters, SensorError};

    struct Idle;

    impl MetricsProvider for Idle {
        fn cpu_percent_per_core(&mut self, _window: Duration) -> Vec<f32> {
            vec![100.0, 0.0]
        }

        fn cpu_percent(&mut self) -> f32 {
            50.0
        }

        fn load_average(&mut self) -> LoadAverage {
            LoadAverage::default()
        }

        fn net_counters(&mut self, _interface: &str) -> NetCounters {
            NetCounters::default()
        }

        fn memory_percent(&mut self) -> f32 {
            0.0
        }
    }

    struct NoSensor;

    impl TemperatureSensor for NoSensor {
        fn read_celsius(&mut self) -> Result<f32, SensorError> {
            Err(SensorError::InvalidData {
                sensor: "none",
                details: "absent",
            })
        }
    }

    #[test]
    fn test_pipeline_defaults_to_cpu_bars() {
        let mut pipeline = Pipeline::new(&Settings::default());
        let mut source = || None::<i32>;
        let (mode, frame) = pipeline.step(&mut Idle, &mut NoSensor, &mut source);

        assert_eq!(mode, Mode::CpuBars);
        assert_eq!(frame.column_count(0), 8);
        assert_eq!(frame.column_count(4), 0);
        assert_eq!(pipeline.selector().ticks(), 1);
    }

    #[test]
    fn test_pipeline_zero_load_animates() {
        let mut pipeline = Pipeline::new(&Settings::default());
        let mut source = || Some(Mode::LoadFill.selector());
        let (_, first) = pipeline.step(&mut Idle, &mut NoSensor, &mut source);
        let (_, second) = pipeline.step(&mut Idle, &mut NoSensor, &mut source);

        assert!(!first.is_blank());
        assert_ne!(first, second);
    }

    #[test]
    fn test_pipeline_missing_sensor_plots_nothing() {
        let mut pipeline = Pipeline::new(&Settings::default());
        let mut source = || Some(Mode::TemperatureLine.selector());
        let (_, frame) = pipeline.step(&mut Idle, &mut NoSensor, &mut source);

        assert!(frame.is_blank());
        assert_eq!(pipeline.sampler().temperature_history().latest(), Some(0.0));
    }

    #[test]
    fn test_stop_handle_is_shared() {
        let stop = StopHandle::new();
        let copy = stop.clone();
        assert!(!copy.is_stop_requested());
        stop.request_stop();
        assert!(copy.is_stop_requested());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            WorkerError::Display("Nack".into()).to_string(),
            "display write failed: Nack"
        );
        assert_eq!(WorkerError::Panicked.to_string(), "worker thread panicked");
    }
}
