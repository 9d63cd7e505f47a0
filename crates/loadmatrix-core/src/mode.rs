//! Rendering modes and the external selector source that picks one

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

/// What the matrix shows. The discriminant is the selector value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// One bar per CPU core
    #[default]
    CpuBars = 0,
    /// Grid filled in proportion to the 1-minute load average
    LoadFill = 1,
    /// Line graph of the last eight temperature readings
    TemperatureLine = 2,
    /// Line graph of the last eight aggregate CPU readings
    CpuLine = 3,
    /// Inbound and outbound throughput bars
    NetworkBars = 4,
    /// CPU bars plus network, memory and temperature columns
    MultiMetric = 5,
    /// Nothing lit
    Blank = 6,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::CpuBars,
        Mode::LoadFill,
        Mode::TemperatureLine,
        Mode::CpuLine,
        Mode::NetworkBars,
        Mode::MultiMetric,
        Mode::Blank,
    ];

    /// Map a selector value onto a mode. Unknown values yield `None`.
    pub fn from_selector(value: i32) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub const fn selector(self) -> i32 {
        self as i32
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CpuBars => "cpu-bars",
            Self::LoadFill => "load-fill",
            Self::TemperatureLine => "temperature-line",
            Self::CpuLine => "cpu-line",
            Self::NetworkBars => "network-bars",
            Self::MultiMetric => "multi-metric",
            Self::Blank => "blank",
        }
    }

    /// Whether sampling in this mode already blocks for a full tick window.
    ///
    /// The worker sleeps one tick after every other mode.
    pub const fn samples_over_tick(self) -> bool {
        matches!(self, Self::CpuBars | Self::MultiMetric)
    }
}

/// External source of the selector value, polled by the mode selector.
///
/// `None` means "no usable value right now"; the selector keeps the mode it
/// already has.
pub trait ModeSource {
    fn read(&mut self) -> Option<i32>;
}

impl<F: FnMut() -> Option<i32>> ModeSource for F {
    fn read(&mut self) -> Option<i32> {
        self()
    }
}

/// Selector stored as a decimal integer in a text file.
#[derive(Debug, Clone)]
pub struct FileModeSource {
    path: PathBuf,
}

impl FileModeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModeSource for FileModeSource {
    fn read(&mut self) -> Option<i32> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                debug!("Cannot read mode file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match contents.trim().parse() {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Mode file {} is not an integer: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_values_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_selector(mode.selector()), Some(mode));
        }
    }

    #[test]
    fn test_unknown_selector_values() {
        assert_eq!(Mode::from_selector(-1), None);
        assert_eq!(Mode::from_selector(7), None);
        assert_eq!(Mode::from_selector(i32::MAX), None);
    }

    #[test]
    fn test_blocking_modes() {
        let blocking: Vec<Mode> = Mode::ALL
            .into_iter()
            .filter(|m| m.samples_over_tick())
            .collect();
        assert_eq!(blocking, [Mode::CpuBars, Mode::MultiMetric]);
    }

    #[test]
    fn test_file_source_reads_trimmed_integer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metric.txt");
        fs::write(&path, "3\n").unwrap();

        let mut source = FileModeSource::new(&path);
        assert_eq!(source.read(), Some(3));
    }

    #[test]
    fn test_file_source_missing_or_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metric.txt");
        let mut source = FileModeSource::new(&path);
        assert_eq!(source.read(), None);

        fs::write(&path, "cpu please").unwrap();
        assert_eq!(source.read(), None);

        fs::write(&path, "").unwrap();
        assert_eq!(source.read(), None);
    }

    #[test]
    fn test_closure_source() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            Some(calls)
        };
        assert_eq!(source.read(), Some(1));
        assert_eq!(source.read(), Some(2));
    }
}
