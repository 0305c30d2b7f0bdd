//! Domain types for tenant-scoped resources.

use std::borrow::Cow;
use std::fmt;

/// Connection URI domain used by the base tenant.
pub const DEFAULT_CONNECTION_URI_DOMAIN: &str = "";
/// App id used by the base tenant.
pub const DEFAULT_APP_ID: &str = "public";
/// Tenant id used by the base tenant.
pub const DEFAULT_TENANT_ID: &str = "public";

/// Identity of a tenant within an app within a connection URI domain.
///
/// Process-global resources live under [`TenantIdentifier::BASE_TENANT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantIdentifier {
    connection_uri_domain: Cow<'static, str>,
    app_id: Cow<'static, str>,
    tenant_id: Cow<'static, str>,
}

impl TenantIdentifier {
    /// The fixed, non-customer identity for process-global resources.
    pub const BASE_TENANT: TenantIdentifier = TenantIdentifier {
        connection_uri_domain: Cow::Borrowed(DEFAULT_CONNECTION_URI_DOMAIN),
        app_id: Cow::Borrowed(DEFAULT_APP_ID),
        tenant_id: Cow::Borrowed(DEFAULT_TENANT_ID),
    };

    /// Creates an identifier. Empty app or tenant ids fall back to the defaults.
    #[must_use]
    pub fn new(
        connection_uri_domain: impl Into<String>,
        app_id: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        let or_default = |value: String, default: &'static str| {
            if value.trim().is_empty() {
                Cow::Borrowed(default)
            } else {
                Cow::Owned(value.trim().to_lowercase())
            }
        };

        Self {
            connection_uri_domain: Cow::Owned(connection_uri_domain.into().trim().to_lowercase()),
            app_id: or_default(app_id.into(), DEFAULT_APP_ID),
            tenant_id: or_default(tenant_id.into(), DEFAULT_TENANT_ID),
        }
    }

    pub fn connection_uri_domain(&self) -> &str {
        &self.connection_uri_domain
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// True for the base tenant of the base app on the default domain.
    pub fn is_base_tenant(&self) -> bool {
        *self == Self::BASE_TENANT
    }
}

impl Default for TenantIdentifier {
    fn default() -> Self {
        Self::BASE_TENANT
    }
}

impl fmt::Display for TenantIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.connection_uri_domain, self.app_id, self.tenant_id
        )
    }
}

/// Key of a resource slot: a tenant plus a resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub tenant: TenantIdentifier,
    pub resource_id: String,
}

impl ResourceKey {
    #[must_use]
    pub fn new(tenant: &TenantIdentifier, resource_id: impl Into<String>) -> Self {
        Self {
            tenant: tenant.clone(),
            resource_id: resource_id.into(),
        }
    }
}
