//! Concurrent initialization and lookup.

use std::sync::{Arc, Barrier};
use std::thread;

use metrics_registry::app::{AppState, MetricsRegistry};
use metrics_registry::config::MetricsConfig;
use metrics_registry::domain::MetricsError;
use metrics_registry::infra::{MeterRegistry, MetricBinder};

const READERS: usize = 8;
const LOOKUPS: usize = 200;

struct RequestMetrics;

impl MetricBinder for RequestMetrics {
    fn name(&self) -> &str {
        "requests"
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        registry.counter("http_requests", &[]).increment(1);
        Ok(())
    }
}

#[test]
fn test_readers_never_observe_partial_instance() {
    let state = AppState::new(MetricsConfig::default());
    let barrier = Barrier::new(READERS + 1);

    thread::scope(|s| {
        s.spawn(|| {
            barrier.wait();
            MetricsRegistry::initialize(&state).unwrap();
        });

        for _ in 0..READERS {
            s.spawn(|| {
                barrier.wait();
                for _ in 0..LOOKUPS {
                    if let Some(registry) = MetricsRegistry::get_instance(&state).unwrap() {
                        // A visible instance always has its defaults bound.
                        assert_eq!(registry.registry().sampler_count(), 5);
                    }
                }
            });
        }
    });

    assert!(MetricsRegistry::get_instance(&state).unwrap().is_some());
}

#[test]
fn test_concurrent_register_and_scrape() {
    let state = AppState::new(MetricsConfig::default());
    let registry = MetricsRegistry::initialize(&state).unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            s.spawn(move || {
                for _ in 0..25 {
                    registry.register_metrics(&[&RequestMetrics]).unwrap();
                    assert!(registry.scrape().contains("http_requests"));
                }
            });
        }
    });

    let line = registry
        .scrape()
        .lines()
        .find(|l| l.starts_with("http_requests") && !l.starts_with('#'))
        .map(str::to_string)
        .unwrap();
    assert!(line.ends_with(" 100"), "unexpected line: {line}");
}
