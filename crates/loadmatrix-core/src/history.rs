//! Fixed-capacity rolling history for the line graph modes

use heapless::Deque;

/// Number of samples kept per series, one per matrix column.
pub const HISTORY_LEN: usize = 8;

/// FIFO window of the most recent `N` samples.
///
/// The window is pre-filled with `T::default()`, so it always holds exactly
/// `N` samples: every [`push`](Self::push) evicts the oldest one.
#[derive(Debug, Clone)]
pub struct RollingHistory<T, const N: usize = HISTORY_LEN> {
    samples: Deque<T, N>,
}

impl<T: Copy + Default, const N: usize> Default for RollingHistory<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> RollingHistory<T, N> {
    /// Create a window of `N` default (zero) samples.
    pub fn new() -> Self {
        let mut history = Self {
            samples: Deque::new(),
        };
        for _ in 0..N {
            history.push(T::default());
        }
        history
    }

    /// Append `value` as the newest sample and return the evicted oldest one.
    pub fn push(&mut self, value: T) -> T {
        let evicted = if self.samples.is_full() {
            self.samples.pop_front()
        } else {
            None
        };
        // There is always room after the eviction above.
        let _ = self.samples.push_back(value);
        evicted.unwrap_or_default()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<T> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy the window out, oldest first.
    pub fn to_array(&self) -> [T; N] {
        let mut out = [T::default(); N];
        for (slot, value) in out.iter_mut().zip(self.samples.iter()) {
            *slot = *value;
        }
        out
    }
}
