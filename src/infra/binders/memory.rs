//! Process and host memory usage.

use std::sync::{Mutex, PoisonError};

use sysinfo::{ProcessRefreshKind, System};

use crate::domain::MetricsError;
use crate::infra::registry::MeterRegistry;

use super::{MetricBinder, current_pid, refresh_process};

pub const PROCESS_RESIDENT_MEMORY: &str = "process_resident_memory_bytes";
pub const PROCESS_VIRTUAL_MEMORY: &str = "process_virtual_memory_bytes";
pub const SYSTEM_MEMORY_TOTAL: &str = "system_memory_total_bytes";
pub const SYSTEM_MEMORY_USED: &str = "system_memory_used_bytes";

/// Samples resident and virtual memory of this process plus host totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryMetrics;

impl MetricBinder for MemoryMetrics {
    fn name(&self) -> &str {
        "memory"
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        let pid = current_pid(self.name())?;

        registry.describe_gauge(PROCESS_RESIDENT_MEMORY, "Resident memory size in bytes");
        registry.describe_gauge(PROCESS_VIRTUAL_MEMORY, "Virtual memory size in bytes");
        registry.describe_gauge(SYSTEM_MEMORY_TOTAL, "Total memory of the host in bytes");
        registry.describe_gauge(SYSTEM_MEMORY_USED, "Used memory of the host in bytes");

        let resident = registry.gauge(PROCESS_RESIDENT_MEMORY, &[]);
        let virtual_memory = registry.gauge(PROCESS_VIRTUAL_MEMORY, &[]);
        let total = registry.gauge(SYSTEM_MEMORY_TOTAL, &[]);
        let used = registry.gauge(SYSTEM_MEMORY_USED, &[]);

        let system = Mutex::new(System::new());
        let sample = move || {
            let mut system = system.lock().unwrap_or_else(PoisonError::into_inner);
            refresh_process(&mut system, pid, ProcessRefreshKind::new().with_memory());
            system.refresh_memory();

            if let Some(process) = system.process(pid) {
                resident.set(process.memory() as f64);
                virtual_memory.set(process.virtual_memory() as f64);
            }
            total.set(system.total_memory() as f64);
            used.set(system.used_memory() as f64);
        };

        // Prime once so the first scrape already has values.
        sample();
        registry.on_scrape(sample);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricsConfig;

    fn gauge_value(output: &str, name: &str) -> Option<f64> {
        output
            .lines()
            .find(|l| l.starts_with(&format!("{name} ")))
            .and_then(|l| l.rsplit(' ').next())
            .and_then(|v| v.parse().ok())
    }

    #[test]
    fn test_memory_series_are_non_zero() {
        let registry = MeterRegistry::new(&MetricsConfig::default()).unwrap();
        MemoryMetrics.bind_to(&registry).unwrap();

        let output = registry.render();
        assert!(gauge_value(&output, PROCESS_RESIDENT_MEMORY).unwrap() > 0.0);
        assert!(gauge_value(&output, SYSTEM_MEMORY_TOTAL).unwrap() > 0.0);
        assert!(output.contains(PROCESS_VIRTUAL_MEMORY));
        assert!(output.contains(SYSTEM_MEMORY_USED));
    }
}
