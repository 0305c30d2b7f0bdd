//! Application layer: the host context, its resource store and the metrics registry.

pub mod distributor;
pub mod metrics_registry;
pub mod state;

pub use distributor::{ResourceDistributor, ResourceMap, SharedResource};
pub use metrics_registry::MetricsRegistry;
pub use state::AppState;
