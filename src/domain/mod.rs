//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, MetricsError, ResourceError};
pub use traits::MetricsProvider;
pub use types::{
    DEFAULT_APP_ID, DEFAULT_CONNECTION_URI_DOMAIN, DEFAULT_TENANT_ID, ResourceKey,
    TenantIdentifier,
};
