//! Per-mode metric sampling with rolling history and counter deltas

use core::time::Duration;

use crate::config::Settings;
use crate::delta::{DeltaState, Throughput};
use crate::history::{HISTORY_LEN, RollingHistory};
use crate::mode::Mode;
use crate::sensors::{MetricsProvider, TemperatureSensor, read_or_zero};

/// Readings gathered for one tick, shaped for the mode that asked for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Per-core CPU percent
    CpuBars(Vec<f32>),
    /// 1-minute load average
    LoadAverage(f32),
    /// Temperature window, oldest first
    TemperatureLine([f32; HISTORY_LEN]),
    /// Aggregate CPU window, oldest first
    CpuLine([f32; HISTORY_LEN]),
    NetworkBars(Throughput),
    MultiMetric(MultiSample),
    Blank,
}

/// Composite reading for [`Mode::MultiMetric`].
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSample {
    pub cores: Vec<f32>,
    pub temperature: f32,
    pub network: Throughput,
    pub memory_percent: f32,
}

/// Owns the state carried between ticks: one rolling window per line-graph
/// series and the network counter baseline.
#[derive(Debug, Clone)]
pub struct MetricSampler {
    interface: String,
    tick: Duration,
    temperature: RollingHistory<f32>,
    cpu: RollingHistory<f32>,
    network: DeltaState,
}

impl MetricSampler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            interface: settings.interface.clone(),
            tick: settings.tick(),
            temperature: RollingHistory::new(),
            cpu: RollingHistory::new(),
            network: DeltaState::new(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn temperature_history(&self) -> &RollingHistory<f32> {
        &self.temperature
    }

    pub fn cpu_history(&self) -> &RollingHistory<f32> {
        &self.cpu
    }

    pub fn network_state(&self) -> &DeltaState {
        &self.network
    }

    /// Take this tick's readings for `mode`.
    ///
    /// The network baseline is refreshed on every tick whatever the mode, so
    /// switching into a network mode shows one tick of traffic rather than
    /// everything since the last time that mode ran.
    pub fn sample<P, T>(&mut self, mode: Mode, provider: &mut P, sensor: &mut T) -> Sample
    where
        P: MetricsProvider + ?Sized,
        T: TemperatureSensor + ?Sized,
    {
        let counters = provider.net_counters(&self.interface);
        let network = self.network.update(counters, self.tick);

        match mode {
            Mode::CpuBars => Sample::CpuBars(provider.cpu_percent_per_core(self.tick)),
            Mode::LoadFill => Sample::LoadAverage(provider.load_average().one),
            Mode::TemperatureLine => {
                self.temperature.push(read_or_zero(sensor));
                Sample::TemperatureLine(self.temperature.to_array())
            }
            Mode::CpuLine => {
                self.cpu.push(provider.cpu_percent());
                Sample::CpuLine(self.cpu.to_array())
            }
            Mode::NetworkBars => Sample::NetworkBars(network),
            Mode::MultiMetric => {
                let cores = provider.cpu_percent_per_core(self.tick);
                let temperature = read_or_zero(sensor);
                self.temperature.push(temperature);
                Sample::MultiMetric(MultiSample {
                    cores,
                    temperature,
                    network,
                    memory_percent: provider.memory_percent(),
                })
            }
            Mode::Blank => Sample::Blank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{LoadAverage, NetCounters, SensorError};

    #[derive(Default)]
    struct StubProvider {
        bytes_in: u64,
        cpu: f32,
        windows: Vec<Duration>,
    }

    impl MetricsProvider for StubProvider {
        fn cpu_percent_per_core(&mut self, window: Duration) -> Vec<f32> {
            self.windows.push(window);
            vec![10.0, 20.0, 30.0, 40.0]
        }

        fn cpu_percent(&mut self) -> f32 {
            self.cpu += 10.0;
            self.cpu
        }

        fn load_average(&mut self) -> LoadAverage {
            LoadAverage {
                one: 0.75,
                five: 0.5,
                fifteen: 0.25,
            }
        }

        fn net_counters(&mut self, interface: &str) -> NetCounters {
            assert_eq!(interface, "eth0");
            self.bytes_in += 1_000;
            NetCounters::new(self.bytes_in, self.bytes_in / 2)
        }

        fn memory_percent(&mut self) -> f32 {
            62.5
        }
    }

    struct Thermometer(Option<f32>);

    impl TemperatureSensor for Thermometer {
        fn read_celsius(&mut self) -> Result<f32, SensorError> {
            self.0.ok_or(SensorError::ReadFailed {
                sensor: "test",
                operation: "read",
                details: "unplugged",
            })
        }
    }

    fn sampler() -> MetricSampler {
        MetricSampler::new(&Settings::default())
    }

    #[test]
    fn test_cpu_bars_blocks_for_one_tick() {
        let mut provider = StubProvider::default();
        let sample = sampler().sample(Mode::CpuBars, &mut provider, &mut Thermometer(None));
        assert_eq!(sample, Sample::CpuBars(vec![10.0, 20.0, 30.0, 40.0]));
        assert_eq!(provider.windows, [Duration::from_secs(1)]);
    }

    #[test]
    fn test_load_uses_one_minute_average() {
        let sample = sampler().sample(
            Mode::LoadFill,
            &mut StubProvider::default(),
            &mut Thermometer(None),
        );
        assert_eq!(sample, Sample::LoadAverage(0.75));
    }

    #[test]
    fn test_temperature_line_rolls() {
        let mut sampler = sampler();
        let mut provider = StubProvider::default();
        sampler.sample(Mode::TemperatureLine, &mut provider, &mut Thermometer(Some(40.0)));
        let sample =
            sampler.sample(Mode::TemperatureLine, &mut provider, &mut Thermometer(Some(42.5)));

        assert_eq!(
            sample,
            Sample::TemperatureLine([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0, 42.5])
        );
    }

    #[test]
    fn test_temperature_failure_records_zero() {
        let mut sampler = sampler();
        let mut provider = StubProvider::default();
        sampler.sample(Mode::TemperatureLine, &mut provider, &mut Thermometer(Some(50.0)));
        let sample = sampler.sample(Mode::TemperatureLine, &mut provider, &mut Thermometer(None));

        assert_eq!(
            sample,
            Sample::TemperatureLine([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 0.0])
        );
        assert_eq!(sampler.temperature_history().latest(), Some(0.0));
    }

    #[test]
    fn test_cpu_line_rolls() {
        let mut sampler = sampler();
        let mut provider = StubProvider::default();
        for _ in 0..10 {
            sampler.sample(Mode::CpuLine, &mut provider, &mut Thermometer(None));
        }
        assert_eq!(
            sampler.cpu_history().to_array(),
            [30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
        );
    }

    #[test]
    fn test_network_baseline_tracks_every_mode() {
        let mut sampler = sampler();
        let mut provider = StubProvider::default();
        sampler.sample(Mode::LoadFill, &mut provider, &mut Thermometer(None));
        sampler.sample(Mode::Blank, &mut provider, &mut Thermometer(None));
        assert_eq!(sampler.network_state().prior(), NetCounters::new(2_000, 1_000));

        let sample = sampler.sample(Mode::NetworkBars, &mut provider, &mut Thermometer(None));
        assert_eq!(
            sample,
            Sample::NetworkBars(Throughput {
                bytes_in: 1_000.0,
                bytes_out: 500.0,
            })
        );
    }

    #[test]
    fn test_multi_metric_composite() {
        let mut sampler = sampler();
        let mut provider = StubProvider::default();
        let sample = sampler.sample(Mode::MultiMetric, &mut provider, &mut Thermometer(Some(55.0)));

        let Sample::MultiMetric(multi) = &sample else {
            panic!("expected a multi-metric sample, got {sample:?}");
        };
        assert_eq!(multi.cores.len(), 4);
        assert_eq!(multi.temperature, 55.0);
        assert_eq!(multi.memory_percent, 62.5);
        // First tick is measured against the zero baseline.
        assert_eq!(multi.network.bytes_in, 1_000.0);
        assert_eq!(sampler.temperature_history().latest(), Some(55.0));
    }
}
