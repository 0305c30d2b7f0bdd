//! Thread counts of the running process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use sysinfo::{ProcessRefreshKind, System};

use crate::domain::MetricsError;
use crate::infra::registry::MeterRegistry;

use super::{MetricBinder, current_pid, refresh_process};

pub const PROCESS_THREADS: &str = "process_threads";
pub const PROCESS_THREADS_PEAK: &str = "process_threads_peak";

/// Samples the live thread count and tracks the highest value seen.
///
/// Per-thread information is only available on Linux; elsewhere both
/// series stay at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadMetrics;

impl MetricBinder for ThreadMetrics {
    fn name(&self) -> &str {
        "threads"
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        let pid = current_pid(self.name())?;

        registry.describe_gauge(PROCESS_THREADS, "Number of live OS threads");
        registry.describe_gauge(PROCESS_THREADS_PEAK, "Peak number of live OS threads");

        let live = registry.gauge(PROCESS_THREADS, &[]);
        let peak = registry.gauge(PROCESS_THREADS_PEAK, &[]);
        let peak_seen = AtomicUsize::new(0);

        let system = Mutex::new(System::new());
        let sample = move || {
            let mut system = system.lock().unwrap_or_else(PoisonError::into_inner);
            // The task list is read on every refresh; no extra kinds are needed.
            refresh_process(&mut system, pid, ProcessRefreshKind::new());

            let Some(count) = system
                .process(pid)
                .and_then(sysinfo::Process::tasks)
                .map(|tasks| tasks.len().max(1))
            else {
                return;
            };
            let highest = peak_seen.fetch_max(count, Ordering::Relaxed).max(count);
            live.set(count as f64);
            peak.set(highest as f64);
        };

        sample();
        registry.on_scrape(sample);
        Ok(())
    }
}
