//! Process Metrics Registry
//!
//! A process-wide Prometheus metrics registry, stored as a tenant-scoped
//! singleton under the base tenant of a multi-tenant resource store.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Application Layer              │
//! │  AppState, ResourceDistributor, registry     │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Tenant types, MetricsProvider, errors      │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  Prometheus recorder, default metric binders │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Explicit lifecycle**: the registry lives in a host context passed to
//!   every call site; there are no hidden statics
//! - **Default runtime metrics**: process info, memory, async runtime,
//!   threads and CPU are bound at initialization
//! - **Extensible**: subsystems add their own [`infra::MetricBinder`]s
//! - **Testability**: [`domain::MetricsProvider`] is mockable
//! - **Logging**: Structured logging with `tracing`
//!
//! # Example
//!
//! ```no_run
//! use metrics_registry::app::{AppState, MetricsRegistry};
//! use metrics_registry::domain::AppError;
//!
//! fn main() -> Result<(), AppError> {
//!     // Once, at startup: config, logging and the registry
//!     let (state, _registry) = AppState::bootstrap()?;
//!
//!     // Anywhere else, e.g. inside a GET /metrics handler
//!     if let Some(registry) = MetricsRegistry::get_instance(&state)? {
//!         let _body = registry.scrape();
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
