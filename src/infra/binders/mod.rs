//! Metric sources that attach themselves to a [`MeterRegistry`].
//!
//! The default set mirrors what a runtime exposes about itself: build
//! info, memory, async scheduler activity, threads and CPU.

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::domain::MetricsError;

use super::registry::MeterRegistry;

pub mod info;
pub mod memory;
pub mod processor;
pub mod runtime;
pub mod threads;

pub use info::ProcessInfoMetrics;
pub use memory::MemoryMetrics;
pub use processor::ProcessorMetrics;
pub use runtime::RuntimeMetrics;
pub use threads::ThreadMetrics;

/// An adapter that, once bound, keeps a registry supplied with values for
/// one subsystem.
pub trait MetricBinder: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Describe and register series on `registry`, attaching a scrape-time
    /// sampler where values must be polled.
    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError>;
}

/// The default binders in registration order.
pub fn default_binders() -> Vec<Box<dyn MetricBinder>> {
    vec![
        Box::new(ProcessInfoMetrics::default()),
        Box::new(MemoryMetrics),
        Box::new(RuntimeMetrics),
        Box::new(ThreadMetrics),
        Box::new(ProcessorMetrics),
    ]
}

pub(crate) fn current_pid(binder: &str) -> Result<Pid, MetricsError> {
    sysinfo::get_current_pid().map_err(|e| MetricsError::binder(binder, e))
}

pub(crate) fn refresh_process(system: &mut System, pid: Pid, kind: ProcessRefreshKind) {
    system.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), true, kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binder_order() {
        let names: Vec<String> = default_binders()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, vec!["info", "memory", "runtime", "threads", "processor"]);
    }

    #[test]
    fn test_current_pid() {
        let pid = current_pid("test").unwrap();
        assert_eq!(pid.as_u32(), std::process::id());
    }
}
