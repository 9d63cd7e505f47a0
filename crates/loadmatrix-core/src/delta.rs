//! Per-tick throughput from cumulative interface counters

use core::time::Duration;

use crate::sensors::NetCounters;

/// Bytes per second in each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Throughput {
    pub bytes_in: f32,
    pub bytes_out: f32,
}

/// Remembers the previous counter sample for one interface.
///
/// The baseline starts at zero, so the very first update reports the whole
/// cumulative counter as one tick of traffic. That spike lasts one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaState {
    prior: NetCounters,
}

impl DeltaState {
    pub const fn new() -> Self {
        Self {
            prior: NetCounters::new(0, 0),
        }
    }

    /// Counters recorded by the last update.
    pub const fn prior(&self) -> NetCounters {
        self.prior
    }

    /// Record `current` and return `(current - prior) / tick`.
    ///
    /// A counter that went backwards (interface reset) reports zero. A zero
    /// `tick` reports the raw per-tick delta.
    pub fn update(&mut self, current: NetCounters, tick: Duration) -> Throughput {
        let bytes_in = current.bytes_in.saturating_sub(self.prior.bytes_in);
        let bytes_out = current.bytes_out.saturating_sub(self.prior.bytes_out);
        self.prior = current;

        let secs = tick.as_secs_f32();
        let per = if secs > 0.0 { secs } else { 1.0 };
        Throughput {
            bytes_in: bytes_in as f32 / per,
            bytes_out: bytes_out as f32 / per,
        }
    }
}
