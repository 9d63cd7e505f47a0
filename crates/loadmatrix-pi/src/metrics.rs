//! Host metrics from `sysinfo`

use std::thread;
use std::time::Duration;

use log::warn;
use loadmatrix_core::{LoadAverage, MetricsProvider, NetCounters};
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, Networks, System};

pub struct SysinfoProvider {
    system: System,
    /// Interface already reported missing, so the warning is logged once.
    missing_interface: Option<String>,
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut system = System::new();
        // Prime the CPU counters so the first non-blocking read has a baseline.
        system.refresh_cpu_usage();
        Self {
            system,
            missing_interface: None,
        }
    }
}

impl MetricsProvider for SysinfoProvider {
    fn cpu_percent_per_core(&mut self, window: Duration) -> Vec<f32> {
        self.system.refresh_cpu_usage();
        thread::sleep(window.max(MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu_usage();
        self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
    }

    fn cpu_percent(&mut self) -> f32 {
        self.system.refresh_cpu_usage();
        self.system.global_cpu_usage()
    }

    fn load_average(&mut self) -> LoadAverage {
        let load = System::load_average();
        LoadAverage {
            one: load.one as f32,
            five: load.five as f32,
            fifteen: load.fifteen as f32,
        }
    }

    fn net_counters(&mut self, interface: &str) -> NetCounters {
        let networks = Networks::new_with_refreshed_list();
        match networks.list().get(interface) {
            Some(data) => {
                self.missing_interface = None;
                NetCounters::new(data.total_received(), data.total_transmitted())
            }
            None => {
                if self.missing_interface.as_deref() != Some(interface) {
                    warn!("Network interface {} not found, reporting zero traffic", interface);
                    self.missing_interface = Some(interface.to_owned());
                }
                NetCounters::default()
            }
        }
    }

    fn memory_percent(&mut self) -> f32 {
        self.system.refresh_memory();
        memory_percent(self.system.used_memory(), self.system.total_memory())
    }
}

fn memory_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 * 100.0 / total as f64) as f32
}
