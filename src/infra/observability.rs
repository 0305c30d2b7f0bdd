//! Prometheus recorder construction and tracing subscriber setup.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusRecorder};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, MetricsConfig};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "metrics_registry=info";

/// Build a Prometheus recorder without installing it globally.
///
/// Each registry owns its own recorder, so independent registries never
/// share series. No HTTP listener is started; output is produced through
/// `PrometheusHandle::render()`.
///
/// # Errors
/// Returns an error if the configured histogram buckets are rejected.
pub fn build_recorder(config: &MetricsConfig) -> Result<PrometheusRecorder, BuildError> {
    let mut builder = PrometheusBuilder::new().with_recommended_naming(config.recommended_naming);

    for (key, value) in &config.global_labels {
        builder = builder.add_global_label(key.clone(), value.clone());
    }
    if let Some(buckets) = &config.histogram_buckets {
        builder = builder.set_buckets(buckets)?;
    }

    Ok(builder.build_recorder())
}

/// Install the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.with_target(false).try_init(),
    };
    result.is_ok()
}
