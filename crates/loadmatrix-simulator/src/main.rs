//! Desktop simulator for the loadmatrix 8x8 LED host monitor.
//!
//! Runs the real loadmatrix-core worker against synthetic metrics and shows
//! every committed frame in an SDL2 window via `embedded-graphics-simulator`.
//!
//! # Key bindings
//!
//! | Key | Mode                          |
//! |-----|-------------------------------|
//! | 0   | CPU bars                      |
//! | 1   | Load fill                     |
//! | 2   | Temperature line              |
//! | 3   | CPU line                      |
//! | 4   | Network bars                  |
//! | 5   | Multi-metric                  |
//! | 6   | Blank                         |
//! | Q   | Quit                          |

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::Keycode,
};
use log::{error, info};

use loadmatrix_core::frame::MATRIX_SIZE;
use loadmatrix_core::{
    Frame, LoadAverage, MatrixDisplay, MetricsProvider, Mode, NetCounters, SensorError, Settings,
    TemperatureSensor, Worker,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Window pixels per LED.
const WINDOW_SCALE: u32 = 48;

/// Gap between LEDs, in window pixels.
const LED_SPACING: u32 = 6;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Synthetic cores reported by the mock provider.
const MOCK_CORES: usize = 4;

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates synthetic host metrics that vary over time.
struct MockMetrics {
    started: Instant,
    counters: NetCounters,
}

impl MockMetrics {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            counters: NetCounters::default(),
        }
    }

    fn t(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl MetricsProvider for MockMetrics {
    fn cpu_percent_per_core(&mut self, window: Duration) -> Vec<f32> {
        thread::sleep(window);
        let t = self.t();
        (0..MOCK_CORES)
            .map(|core| {
                let phase = core as f64 * 1.7;
                (50.0 + 45.0 * (t / 7.0 + phase).sin()) as f32
            })
            .collect()
    }

    fn cpu_percent(&mut self) -> f32 {
        let t = self.t();
        (50.0 + 40.0 * (t / 11.0).sin() + 8.0 * (t / 3.0).cos()) as f32
    }

    fn load_average(&mut self) -> LoadAverage {
        // Dips to zero for part of each cycle so the idle animation shows.
        let t = self.t();
        let one = (2.5 * (t / 15.0).sin()).max(0.0) as f32;
        LoadAverage {
            one,
            five: one * 0.8,
            fifteen: one * 0.6,
        }
    }

    fn net_counters(&mut self, _interface: &str) -> NetCounters {
        let t = self.t();
        let inbound = 5_000.0 + 5_000.0 * (t / 9.0).sin();
        let outbound = 3_000.0 + 3_000.0 * (t / 5.0).cos();
        self.counters.bytes_in += inbound as u64;
        self.counters.bytes_out += outbound as u64;
        self.counters
    }

    fn memory_percent(&mut self) -> f32 {
        (60.0 + 20.0 * (self.t() / 30.0).sin()) as f32
    }
}

/// Board temperature between 40 and 80 degrees that drops out now and then.
struct MockThermometer {
    reads: u32,
    started: Instant,
}

impl MockThermometer {
    fn new() -> Self {
        Self {
            reads: 0,
            started: Instant::now(),
        }
    }
}

impl TemperatureSensor for MockThermometer {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        if self.reads % 13 == 0 {
            return Err(SensorError::ReadFailed {
                sensor: "mock",
                operation: "read temperature",
                details: "simulated dropout",
            });
        }
        let t = self.started.elapsed().as_secs_f64();
        Ok((60.0 + 20.0 * (t / 20.0).sin()) as f32)
    }
}

// ---------------------------------------------------------------------------
// Display bridge
// ---------------------------------------------------------------------------

/// Stages pixels like the LED backpack and hands each committed frame to the
/// window thread.
struct ChannelDisplay {
    staged: Frame,
    frames: Sender<Frame>,
}

impl ChannelDisplay {
    fn new() -> (Self, Receiver<Frame>) {
        let (frames, receiver) = mpsc::channel();
        let display = Self {
            staged: Frame::blank(),
            frames,
        };
        (display, receiver)
    }
}

impl MatrixDisplay for ChannelDisplay {
    type Error = SendError<Frame>;

    fn clear(&mut self) {
        self.staged = Frame::blank();
    }

    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        self.staged.set(usize::from(x), usize::from(y), on);
    }

    fn set_image(&mut self, frame: &Frame) {
        self.staged = *frame;
    }

    fn write_display(&mut self) -> Result<(), Self::Error> {
        self.frames.send(self.staged)
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Map an SDL keycode to a selector value.
fn keycode_to_mode(keycode: Keycode) -> Option<Mode> {
    let selector = match keycode {
        Keycode::Num0 | Keycode::Kp0 => 0,
        Keycode::Num1 | Keycode::Kp1 => 1,
        Keycode::Num2 | Keycode::Kp2 => 2,
        Keycode::Num3 | Keycode::Kp3 => 3,
        Keycode::Num4 | Keycode::Kp4 => 4,
        Keycode::Num5 | Keycode::Kp5 => 5,
        Keycode::Num6 | Keycode::Kp6 => 6,
        _ => return None,
    };
    Mode::from_selector(selector)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting loadmatrix simulator");
    info!("Keys: 0=CPU bars  1=Load  2=Temp line  3=CPU line  4=Network  5=Multi  6=Blank  Q=Quit");

    let size = MATRIX_SIZE as u32;
    let mut display = SimulatorDisplay::<BinaryColor>::new(Size::new(size, size));
    let output_settings = OutputSettingsBuilder::new()
        .scale(WINDOW_SCALE)
        .pixel_spacing(LED_SPACING)
        .theme(BinaryColorTheme::OledWhite)
        .build();
    let mut window = Window::new("loadmatrix", &output_settings);

    // Keys write the selector; the worker polls it every tick.
    let selector = Arc::new(AtomicI32::new(Mode::default().selector()));
    let source = {
        let selector = Arc::clone(&selector);
        move || Some(selector.load(Ordering::Relaxed))
    };
    let settings = Settings {
        mode_poll_ticks: 1,
        ..Settings::default()
    };

    let (matrix, frames) = ChannelDisplay::new();
    let worker = Worker::new(MockMetrics::new(), MockThermometer::new(), matrix, source, settings);
    let handle = match worker.start() {
        Ok(handle) => handle,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }

                    if let Some(mode) = keycode_to_mode(keycode) {
                        info!("Selecting {}", mode.label());
                        selector.store(mode.selector(), Ordering::Relaxed);
                    }
                }

                _ => {}
            }
        }

        // --- Committed frames ---------------------------------------------
        if let Some(frame) = frames.try_iter().last() {
            let _ = frame.draw(&mut display);
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    handle.request_stop();
    match handle.join() {
        Ok(_) => info!("Simulator exiting"),
        Err(e) => error!("Worker failed: {}", e),
    }
}
