//! Build and lifetime information about the running process.

use std::time::{SystemTime, UNIX_EPOCH};

use sysinfo::{ProcessRefreshKind, System};
use tracing::debug;

use crate::domain::MetricsError;
use crate::infra::registry::MeterRegistry;

use super::{MetricBinder, current_pid, refresh_process};

pub const PROCESS_INFO: &str = "process_info";
pub const PROCESS_START_TIME: &str = "process_start_time_seconds";
pub const PROCESS_UPTIME: &str = "process_uptime_seconds";

/// Reports `process_info{version,os,arch} 1`, the process start time and uptime.
#[derive(Debug, Clone)]
pub struct ProcessInfoMetrics {
    version: String,
}

impl ProcessInfoMetrics {
    /// Reports `version` instead of this crate's version.
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl Default for ProcessInfoMetrics {
    fn default() -> Self {
        Self::with_version(env!("CARGO_PKG_VERSION"))
    }
}

impl MetricBinder for ProcessInfoMetrics {
    fn name(&self) -> &str {
        "info"
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        let pid = current_pid(self.name())?;
        let mut system = System::new();
        refresh_process(&mut system, pid, ProcessRefreshKind::new());
        let start_time = system
            .process(pid)
            .map(sysinfo::Process::start_time)
            .ok_or_else(|| MetricsError::binder(self.name(), format!("process {pid} not found")))?;

        registry.describe_gauge(PROCESS_INFO, "Process build and platform information");
        registry.describe_gauge(
            PROCESS_START_TIME,
            "Start time of the process since unix epoch in seconds",
        );
        registry.describe_gauge(PROCESS_UPTIME, "Uptime of the process in seconds");

        registry
            .gauge(
                PROCESS_INFO,
                &[
                    ("version", self.version.as_str()),
                    ("os", std::env::consts::OS),
                    ("arch", std::env::consts::ARCH),
                ],
            )
            .set(1.0);
        registry.gauge(PROCESS_START_TIME, &[]).set(start_time as f64);

        let uptime = registry.gauge(PROCESS_UPTIME, &[]);
        registry.on_scrape(move || {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(start_time);
            uptime.set(now.saturating_sub(start_time) as f64);
        });

        debug!(pid = %pid, start_time, "Bound process info metrics");
        Ok(())
    }
}
