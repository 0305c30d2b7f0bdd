//! The registry instance: a Prometheus recorder plus scrape-time samplers.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Label, Level, Metadata, Recorder, SharedString,
};
use metrics_exporter_prometheus::{PrometheusHandle, PrometheusRecorder};

use crate::config::MetricsConfig;
use crate::domain::MetricsError;

use super::observability::build_recorder;

type Sampler = Arc<dyn Fn() + Send + Sync>;

const METADATA: Metadata<'static> = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// In-memory store of named metric series, rendered on demand.
///
/// Handles returned by [`counter`](Self::counter), [`gauge`](Self::gauge) and
/// [`histogram`](Self::histogram) are atomic and may be updated from any
/// thread. Samplers registered with [`on_scrape`](Self::on_scrape) run right
/// before every [`render`](Self::render) so sampled values are fresh.
pub struct MeterRegistry {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    samplers: Mutex<Vec<Sampler>>,
}

impl MeterRegistry {
    /// Creates an empty registry from the given configuration.
    ///
    /// # Errors
    /// Propagates the exporter's build error unmodified.
    pub fn new(config: &MetricsConfig) -> Result<Self, MetricsError> {
        let recorder = build_recorder(config)?;
        let handle = recorder.handle();
        Ok(Self {
            recorder,
            handle,
            samplers: Mutex::new(Vec::new()),
        })
    }

    pub fn describe_counter(&self, name: &str, help: impl Into<SharedString>) {
        self.recorder
            .describe_counter(KeyName::from(name.to_owned()), None, help.into());
    }

    pub fn describe_gauge(&self, name: &str, help: impl Into<SharedString>) {
        self.recorder
            .describe_gauge(KeyName::from(name.to_owned()), None, help.into());
    }

    pub fn describe_histogram(&self, name: &str, help: impl Into<SharedString>) {
        self.recorder
            .describe_histogram(KeyName::from(name.to_owned()), None, help.into());
    }

    /// Registers (or fetches) a counter series.
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> Counter {
        self.recorder.register_counter(&key(name, labels), &METADATA)
    }

    /// Registers (or fetches) a gauge series.
    pub fn gauge(&self, name: &str, labels: &[(&str, &str)]) -> Gauge {
        self.recorder.register_gauge(&key(name, labels), &METADATA)
    }

    /// Registers (or fetches) a histogram series.
    pub fn histogram(&self, name: &str, labels: &[(&str, &str)]) -> Histogram {
        self.recorder.register_histogram(&key(name, labels), &METADATA)
    }

    /// Adds a closure that refreshes sampled values before each render.
    pub fn on_scrape<F>(&self, sampler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.samplers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(sampler));
    }

    /// Number of registered scrape-time samplers.
    pub fn sampler_count(&self) -> usize {
        self.samplers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Runs all samplers, then renders every series in the Prometheus text format.
    pub fn render(&self) -> String {
        // Samplers run outside the lock so they may register further series.
        let samplers: Vec<Sampler> = self
            .samplers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for sampler in &samplers {
            sampler();
        }
        self.handle.render()
    }

    /// Performs histogram housekeeping. Call periodically when histograms are used.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

impl fmt::Debug for MeterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeterRegistry")
            .field("samplers", &self.sampler_count())
            .finish_non_exhaustive()
    }
}

fn key(name: &str, labels: &[(&str, &str)]) -> Key {
    let labels: Vec<Label> = labels
        .iter()
        .map(|(k, v)| Label::new(k.to_string(), v.to_string()))
        .collect();
    Key::from_parts(name.to_owned(), labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn registry() -> MeterRegistry {
        MeterRegistry::new(&MetricsConfig::default()).unwrap()
    }

    fn value_line<'a>(output: &'a str, prefix: &str) -> Option<&'a str> {
        output
            .lines()
            .find(|line| !line.starts_with('#') && line.starts_with(prefix))
    }

    #[test]
    fn test_counter_is_rendered() {
        let registry = registry();
        registry.describe_counter("jobs_processed", "Jobs processed by the worker");
        let counter = registry.counter("jobs_processed", &[]);
        counter.increment(2);

        let output = registry.render();
        assert!(output.contains("# HELP jobs_processed"));
        assert!(output.contains("# TYPE jobs_processed"));
        let line = value_line(&output, "jobs_processed").unwrap();
        assert!(line.ends_with(" 2"), "unexpected line: {line}");
    }

    #[test]
    fn test_gauge_with_labels() {
        let registry = registry();
        registry.gauge("queue_depth", &[("queue", "emails")]).set(7.0);

        let output = registry.render();
        assert!(output.contains("queue_depth{queue=\"emails\"} 7"));
    }

    #[test]
    fn test_same_key_returns_same_series() {
        let registry = registry();
        registry.counter("requests", &[]).increment(1);
        registry.counter("requests", &[]).increment(1);

        let output = registry.render();
        let line = value_line(&output, "requests").unwrap();
        assert!(line.ends_with(" 2"), "unexpected line: {line}");
    }

    #[test]
    fn test_samplers_run_on_each_render() {
        let registry = registry();
        let calls = Arc::new(AtomicU64::new(0));
        let gauge = registry.gauge("sampled_value", &[]);
        let counted = Arc::clone(&calls);
        registry.on_scrape(move || {
            let n = counted.fetch_add(1, Ordering::SeqCst) + 1;
            gauge.set(n as f64);
        });

        assert_eq!(registry.sampler_count(), 1);
        registry.render();
        let output = registry.render();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(output.contains("sampled_value 2"));
    }

    #[test]
    fn test_global_labels_are_applied() {
        let config = MetricsConfig {
            global_labels: vec![("service".to_string(), "core".to_string())],
            ..Default::default()
        };
        let registry = MeterRegistry::new(&config).unwrap();
        registry.gauge("up", &[]).set(1.0);

        assert!(registry.render().contains("service=\"core\""));
    }

    #[test]
    fn test_registries_are_independent() {
        let first = registry();
        let second = registry();
        first.counter("only_in_first", &[]).increment(1);

        assert!(first.render().contains("only_in_first"));
        assert!(!second.render().contains("only_in_first"));
    }

    #[test]
    fn test_histogram_with_buckets() {
        let config = MetricsConfig {
            histogram_buckets: Some(vec![0.1, 1.0]),
            ..Default::default()
        };
        let registry = MeterRegistry::new(&config).unwrap();
        registry.describe_histogram("latency_seconds", "Request latency");
        let histogram = registry.histogram("latency_seconds", &[]);
        histogram.record(0.05);
        histogram.record(0.5);
        registry.run_upkeep();

        let output = registry.render();
        assert!(output.contains("# TYPE latency_seconds histogram"), "{output}");
        assert!(output.contains("latency_seconds_bucket{le=\"0.1\"} 1"), "{output}");
        assert!(output.contains("latency_seconds_bucket{le=\"+Inf\"} 2"), "{output}");
        assert!(output.contains("latency_seconds_count 2"), "{output}");
    }

    #[test]
    fn test_histogram_without_buckets_is_summary() {
        let registry = registry();
        let histogram = registry.histogram("latency_seconds", &[]);
        for value in [0.01, 0.02, 0.03] {
            histogram.record(value);
        }
        registry.run_upkeep();

        let output = registry.render();
        assert!(output.contains("# TYPE latency_seconds summary"), "{output}");
        assert!(output.contains("latency_seconds{quantile="), "{output}");
        assert!(!output.contains("_bucket"), "{output}");
        assert!(output.contains("latency_seconds_count 3"), "{output}");
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", registry());
        assert!(debug_str.contains("MeterRegistry"));
        assert!(debug_str.contains("samplers"));
    }
}
