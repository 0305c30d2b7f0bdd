//! Domain traits defining contracts for metrics-capable resources.

/// Any resource that can render its metrics as exposition text.
///
/// Scrape endpoints depend on this trait rather than on the concrete
/// registry, so they can be exercised with a mock provider.
pub trait MetricsProvider: Send + Sync {
    /// Render the current state in the Prometheus text exposition format.
    fn scrape(&self) -> String;
}
