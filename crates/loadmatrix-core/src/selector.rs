//! Amortised polling of the mode selector source

use log::{debug, info};

use crate::mode::{Mode, ModeSource};

/// Tracks the active [`Mode`], re-reading the source on the first tick and
/// then once every `poll_every` ticks.
///
/// With the default cadence of 20 the source is read on ticks 1, 21, 41, ...
/// and a change made in between is only picked up at the next read.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    mode: Mode,
    poll_every: u32,
    ticks: u64,
}

impl ModeSelector {
    /// Start in [`Mode::CpuBars`]. A cadence of 0 is treated as 1.
    pub fn new(poll_every: u32) -> Self {
        Self {
            mode: Mode::default(),
            poll_every: poll_every.max(1),
            ticks: 0,
        }
    }

    pub const fn current_mode(&self) -> Mode {
        self.mode
    }

    /// Ticks seen so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the next call to [`on_tick`](Self::on_tick) reads the source.
    pub fn polls_next_tick(&self) -> bool {
        self.ticks % u64::from(self.poll_every) == 0
    }

    /// Advance one tick and return the mode to render during it.
    pub fn on_tick<S: ModeSource + ?Sized>(&mut self, source: &mut S) -> Mode {
        if self.polls_next_tick() {
            self.refresh(source);
        }
        self.ticks += 1;
        self.mode
    }

    /// Read the source now. Absent or unknown values keep the current mode.
    pub fn refresh<S: ModeSource + ?Sized>(&mut self, source: &mut S) {
        let Some(value) = source.read() else {
            debug!("Mode source unavailable, staying in {}", self.mode.label());
            return;
        };

        match Mode::from_selector(value) {
            Some(mode) if mode != self.mode => {
                info!("Mode changed: {} -> {}", self.mode.label(), mode.label());
                self.mode = mode;
            }
            Some(_) => {}
            None => debug!(
                "Ignoring unknown selector value {}, staying in {}",
                value,
                self.mode.label()
            ),
        }
    }
}
