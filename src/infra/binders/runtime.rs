//! Async runtime scheduler activity.
//!
//! There is no garbage collector to report on; the tokio scheduler is the
//! managed runtime whose load shows up here instead.

use tokio::runtime::Handle;

use crate::domain::MetricsError;
use crate::infra::registry::MeterRegistry;

use super::MetricBinder;

pub const RUNTIME_ATTACHED: &str = "tokio_runtime_attached";
pub const RUNTIME_WORKERS: &str = "tokio_runtime_workers";
pub const RUNTIME_ALIVE_TASKS: &str = "tokio_runtime_alive_tasks";
pub const RUNTIME_GLOBAL_QUEUE_DEPTH: &str = "tokio_runtime_global_queue_depth";

/// Samples the tokio runtime current at scrape time, falling back to the
/// runtime that was current at bind time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeMetrics;

impl MetricBinder for RuntimeMetrics {
    fn name(&self) -> &str {
        "runtime"
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        registry.describe_gauge(
            RUNTIME_ATTACHED,
            "Whether a tokio runtime was reachable at scrape time",
        );
        registry.describe_gauge(RUNTIME_WORKERS, "Number of runtime worker threads");
        registry.describe_gauge(RUNTIME_ALIVE_TASKS, "Number of tasks alive in the runtime");
        registry.describe_gauge(
            RUNTIME_GLOBAL_QUEUE_DEPTH,
            "Number of tasks waiting in the runtime's global queue",
        );

        let attached = registry.gauge(RUNTIME_ATTACHED, &[]);
        let workers = registry.gauge(RUNTIME_WORKERS, &[]);
        let alive_tasks = registry.gauge(RUNTIME_ALIVE_TASKS, &[]);
        let queue_depth = registry.gauge(RUNTIME_GLOBAL_QUEUE_DEPTH, &[]);

        let bound = Handle::try_current().ok();
        let sample = move || {
            let current = Handle::try_current().ok();
            let Some(handle) = current.as_ref().or(bound.as_ref()) else {
                attached.set(0.0);
                return;
            };

            let metrics = handle.metrics();
            attached.set(1.0);
            workers.set(metrics.num_workers() as f64);
            alive_tasks.set(metrics.num_alive_tasks() as f64);
            queue_depth.set(metrics.global_queue_depth() as f64);
        };

        sample();
        registry.on_scrape(sample);
        Ok(())
    }
}
