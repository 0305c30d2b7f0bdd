//! CPU availability and utilisation.

use std::sync::{Mutex, PoisonError};

use sysinfo::{ProcessRefreshKind, System};

use crate::domain::MetricsError;
use crate::infra::registry::MeterRegistry;

use super::{MetricBinder, current_pid, refresh_process};

pub const SYSTEM_CPU_COUNT: &str = "system_cpu_count";
pub const SYSTEM_CPU_USAGE: &str = "system_cpu_usage";
pub const PROCESS_CPU_USAGE: &str = "process_cpu_usage";

/// Samples host and process CPU usage as ratios in `[0, 1]`.
///
/// Usage is computed between consecutive samples, so the very first
/// scrape reports zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorMetrics;

impl MetricBinder for ProcessorMetrics {
    fn name(&self) -> &str {
        "processor"
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        let pid = current_pid(self.name())?;
        let cpus = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .map_err(|e| MetricsError::binder(self.name(), e.to_string()))?;

        registry.describe_gauge(SYSTEM_CPU_COUNT, "Number of processors available to the process");
        registry.describe_gauge(SYSTEM_CPU_USAGE, "Recent CPU usage of the whole host");
        registry.describe_gauge(PROCESS_CPU_USAGE, "Recent CPU usage of this process");

        registry.gauge(SYSTEM_CPU_COUNT, &[]).set(cpus as f64);
        let system_usage = registry.gauge(SYSTEM_CPU_USAGE, &[]);
        let process_usage = registry.gauge(PROCESS_CPU_USAGE, &[]);

        let system = Mutex::new(System::new());
        let sample = move || {
            let mut system = system.lock().unwrap_or_else(PoisonError::into_inner);
            system.refresh_cpu_usage();
            refresh_process(&mut system, pid, ProcessRefreshKind::new().with_cpu());

            system_usage.set(ratio(f64::from(system.global_cpu_usage()), 1));
            if let Some(process) = system.process(pid) {
                process_usage.set(ratio(f64::from(process.cpu_usage()), cpus));
            }
        };

        sample();
        registry.on_scrape(sample);
        Ok(())
    }
}

/// Converts a percentage spread over `cpus` processors into a `[0, 1]` ratio.
fn ratio(percent: f64, cpus: usize) -> f64 {
    (percent / 100.0 / cpus as f64).clamp(0.0, 1.0)
}
