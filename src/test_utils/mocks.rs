//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of the crate's traits
//! that can be configured to simulate success and failure.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{MetricsError, MetricsProvider};
use crate::infra::{MeterRegistry, MetricBinder};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

/// Mock metric source.
///
/// On success it registers a counter named after the binder and
/// increments it once per bind.
///
/// # Example
///
/// ```ignore
/// use metrics_registry::config::MetricsConfig;
/// use metrics_registry::infra::{MeterRegistry, MetricBinder};
/// use metrics_registry::test_utils::MockBinder;
///
/// let registry = MeterRegistry::new(&MetricsConfig::default()).unwrap();
/// let binder = MockBinder::new("cache_hits");
/// binder.bind_to(&registry).unwrap();
///
/// assert_eq!(binder.bind_count(), 1);
/// assert!(registry.render().contains("cache_hits"));
/// ```
#[derive(Debug)]
pub struct MockBinder {
    name: String,
    config: MockConfig,
    bind_count: AtomicU64,
}

impl MockBinder {
    /// Creates a binder that succeeds.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, MockConfig::success())
    }

    /// Creates a binder with the given configuration.
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: MockConfig) -> Self {
        Self {
            name: name.into(),
            config,
            bind_count: AtomicU64::new(0),
        }
    }

    /// Creates a binder that always fails.
    #[must_use]
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_config(name, MockConfig::failure(message))
    }

    /// Number of successful binds.
    pub fn bind_count(&self) -> u64 {
        self.bind_count.load(Ordering::Relaxed)
    }
}

impl MetricBinder for MockBinder {
    fn name(&self) -> &str {
        &self.name
    }

    fn bind_to(&self, registry: &MeterRegistry) -> Result<(), MetricsError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock binder error".to_string());
            return Err(MetricsError::binder(&self.name, msg));
        }

        registry.describe_counter(&self.name, format!("Mock series {}", self.name));
        registry.counter(&self.name, &[]).increment(1);
        self.bind_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Mock metrics provider returning a fixed payload.
#[derive(Debug, Default)]
pub struct MockMetricsProvider {
    payload: Mutex<String>,
    call_count: AtomicU64,
}

impl MockMetricsProvider {
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(payload.into()),
            call_count: AtomicU64::new(0),
        }
    }

    /// Replaces the payload returned by later scrapes.
    pub fn set_payload(&self, payload: impl Into<String>) {
        *self.payload.lock().unwrap() = payload.into();
    }

    /// Gets the number of times `scrape` was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl MetricsProvider for MockMetricsProvider {
    fn scrape(&self) -> String {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.payload.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricsConfig;

    #[test]
    fn test_mock_binder_success() {
        let registry = MeterRegistry::new(&MetricsConfig::default()).unwrap();
        let binder = MockBinder::new("mock_source");

        binder.bind_to(&registry).unwrap();
        assert_eq!(binder.bind_count(), 1);
        assert!(registry.render().contains("mock_source"));
    }

    #[test]
    fn test_mock_binder_failure() {
        let registry = MeterRegistry::new(&MetricsConfig::default()).unwrap();
        let binder = MockBinder::failing("mock_source", "no luck");

        let err = binder.bind_to(&registry).unwrap_err();
        assert_eq!(err.to_string(), "Binder 'mock_source' failed: no luck");
        assert_eq!(binder.bind_count(), 0);
        assert!(!registry.render().contains("mock_source"));
    }

    #[test]
    fn test_mock_provider_through_trait_object() {
        let mock = MockMetricsProvider::new("up 1\n");
        let provider: &dyn MetricsProvider = &mock;

        assert_eq!(provider.scrape(), "up 1\n");
        mock.set_payload("up 0\n");
        assert_eq!(provider.scrape(), "up 0\n");
        assert_eq!(mock.call_count(), 2);
    }
}
