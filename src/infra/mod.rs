//! Infrastructure layer implementations.

pub mod binders;
pub mod observability;
pub mod registry;

pub use binders::{
    MemoryMetrics, MetricBinder, ProcessInfoMetrics, ProcessorMetrics, RuntimeMetrics,
    ThreadMetrics, default_binders,
};
pub use observability::{build_recorder, init_tracing};
pub use registry::MeterRegistry;
