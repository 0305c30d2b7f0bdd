//! The process-wide metrics registry resource.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::MetricsConfig;
use crate::domain::{MetricsError, MetricsProvider, ResourceError, TenantIdentifier};
use crate::infra::{MeterRegistry, MetricBinder, default_binders};

use super::state::AppState;

/// One metrics registry per process, stored under the base tenant.
///
/// Created by [`initialize`](Self::initialize) at startup and looked up
/// anywhere else with [`get_instance`](Self::get_instance). The instance is
/// deliberately never per-tenant: lookups always use
/// [`TenantIdentifier::BASE_TENANT`].
#[derive(Debug)]
pub struct MetricsRegistry {
    registry: MeterRegistry,
}

impl MetricsRegistry {
    /// Resource kind under which the registry is stored.
    pub const RESOURCE_ID: &'static str = "metrics_registry";

    /// Builds the registry, binds the default metrics and stores it in the
    /// host's resource distributor.
    ///
    /// Calling this again replaces the stored instance; series recorded on
    /// the previous instance are no longer reachable through the host.
    ///
    /// # Errors
    /// Propagates exporter build failures and default binder failures.
    #[instrument(skip_all)]
    pub fn initialize(state: &AppState) -> Result<Arc<Self>, MetricsError> {
        Self::initialize_with(state, default_binders())
    }

    /// Like [`initialize`](Self::initialize) with an explicit default set.
    ///
    /// Nothing is stored unless every binder succeeds.
    pub(crate) fn initialize_with(
        state: &AppState,
        binders: Vec<Box<dyn MetricBinder>>,
    ) -> Result<Arc<Self>, MetricsError> {
        let instance = Arc::new(Self::new(&state.config, binders)?);
        let replaced = state.resource_distributor().set_resource(
            &TenantIdentifier::BASE_TENANT,
            Self::RESOURCE_ID,
            Arc::clone(&instance),
        );

        if replaced {
            warn!("Metrics registry re-initialized; previous instance and its series were dropped");
        } else {
            info!("Metrics registry initialized");
        }
        Ok(instance)
    }

    /// Returns the registry stored under the base tenant, or `None` if
    /// [`initialize`](Self::initialize) has not run.
    ///
    /// # Errors
    /// Only a slot holding a foreign type is an error; an empty slot is `None`.
    pub fn get_instance(state: &AppState) -> Result<Option<Arc<Self>>, ResourceError> {
        match state
            .resource_distributor()
            .get_resource::<Self>(&TenantIdentifier::BASE_TENANT, Self::RESOURCE_ID)
        {
            Ok(instance) => Ok(Some(instance)),
            Err(ResourceError::TenantOrAppNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn new(
        config: &MetricsConfig,
        binders: Vec<Box<dyn MetricBinder>>,
    ) -> Result<Self, MetricsError> {
        let this = Self {
            registry: MeterRegistry::new(config)?,
        };
        this.register_default_metrics(binders)?;
        Ok(this)
    }

    fn register_default_metrics(
        &self,
        binders: Vec<Box<dyn MetricBinder>>,
    ) -> Result<(), MetricsError> {
        for binder in binders {
            self.bind(binder.as_ref())?;
        }
        Ok(())
    }

    /// The underlying registry. Callers may register series on it but do not own it.
    pub fn registry(&self) -> &MeterRegistry {
        &self.registry
    }

    /// Renders every series in the Prometheus text exposition format.
    pub fn scrape(&self) -> String {
        self.registry.render()
    }

    /// Binds additional metric sources in the given order.
    ///
    /// Sources are not deduplicated; binding the same source twice follows
    /// the exporter's own rules for repeated keys.
    ///
    /// # Errors
    /// Stops at and returns the first binder failure.
    pub fn register_metrics(&self, binders: &[&dyn MetricBinder]) -> Result<(), MetricsError> {
        for binder in binders {
            self.bind(*binder)?;
        }
        info!(count = binders.len(), "Registered additional metric sources");
        Ok(())
    }

    fn bind(&self, binder: &dyn MetricBinder) -> Result<(), MetricsError> {
        binder.bind_to(&self.registry).inspect_err(|e| {
            warn!(binder = %binder.name(), error = %e, "Failed to bind metric source");
        })?;
        debug!(binder = %binder.name(), "Bound metric source");
        Ok(())
    }
}

impl MetricsProvider for MetricsRegistry {
    fn scrape(&self) -> String {
        self.registry.render()
    }
}
