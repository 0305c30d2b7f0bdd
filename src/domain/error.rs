//! Application error types with proper error chaining.

use thiserror::Error;

use super::types::TenantIdentifier;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Tenant or app not found: {0}")]
    TenantOrAppNotFound(TenantIdentifier),
    #[error("Resource '{resource_id}' has an unexpected type")]
    TypeMismatch { resource_id: String },
}

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Failed to build Prometheus recorder: {0}")]
    Build(#[from] metrics_exporter_prometheus::BuildError),
    #[error("Binder '{binder}' failed: {message}")]
    Binder { binder: String, message: String },
}

impl MetricsError {
    /// Shorthand for a binder failure.
    pub fn binder(binder: impl Into<String>, message: impl Into<String>) -> Self {
        MetricsError::Binder {
            binder: binder.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<&str> for ConfigError {
    fn from(s: &str) -> Self {
        ConfigError::ParseError(s.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
