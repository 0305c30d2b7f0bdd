//! Application state management.
//!
//! This module provides the host context that owns process-wide resources.
//! It is created once at startup and passed explicitly to every component
//! that needs a tenant-scoped singleton.

use std::sync::Arc;

use crate::config::MetricsConfig;
use crate::domain::{AppError, ConfigError};
use crate::infra::init_tracing;

use super::distributor::ResourceDistributor;
use super::metrics_registry::MetricsRegistry;

/// Shared host context.
///
/// # Thread Safety
///
/// The resource distributor is wrapped in `Arc` and synchronizes its own
/// slots, making `AppState` safe to share across threads and async tasks.
///
/// # Example
///
/// ```
/// use metrics_registry::app::{AppState, MetricsRegistry};
/// use metrics_registry::config::MetricsConfig;
///
/// let state = AppState::new(MetricsConfig::default());
/// MetricsRegistry::initialize(&state).unwrap();
///
/// let registry = MetricsRegistry::get_instance(&state).unwrap().unwrap();
/// assert!(registry.scrape().contains("process_info"));
/// ```
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tenant-scoped singleton resources.
    pub resources: Arc<ResourceDistributor>,

    /// Metrics and logging configuration.
    pub config: MetricsConfig,
}

impl AppState {
    /// Creates a new `AppState` with an empty resource distributor.
    #[must_use]
    pub fn new(config: MetricsConfig) -> Self {
        Self::with_resources(Arc::new(ResourceDistributor::new()), config)
    }

    /// Creates a new `AppState` around an existing distributor.
    ///
    /// This is useful for testing when several hosts should share slots.
    #[must_use]
    pub fn with_resources(resources: Arc<ResourceDistributor>, config: MetricsConfig) -> Self {
        Self { resources, config }
    }

    /// Creates a new `AppState` from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(MetricsConfig::load()?))
    }

    /// Startup entry point for hosts: loads configuration from the
    /// environment, installs logging and initializes the metrics registry.
    ///
    /// # Errors
    /// Returns the first configuration or metrics failure.
    pub fn bootstrap() -> Result<(Self, Arc<MetricsRegistry>), AppError> {
        Self::bootstrap_with(MetricsConfig::load()?)
    }

    /// Same as [`bootstrap`](Self::bootstrap) with an explicit configuration.
    pub fn bootstrap_with(config: MetricsConfig) -> Result<(Self, Arc<MetricsRegistry>), AppError> {
        init_tracing(config.log_format);
        let state = Self::new(config);
        let registry = MetricsRegistry::initialize(&state)?;
        Ok((state, registry))
    }

    pub fn resource_distributor(&self) -> &ResourceDistributor {
        &self.resources
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MetricsConfig::default())
    }
}
