//! Keyed store of tenant-scoped singleton resources.
//!
//! Each slot is addressed by a [`ResourceKey`]: a tenant plus a resource
//! kind. Values are stored fully constructed behind an `Arc`, so a reader
//! either sees the previous value or the new one, never a partial write.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::domain::{ResourceError, ResourceKey, TenantIdentifier};

/// A stored resource.
pub type SharedResource = Arc<dyn Any + Send + Sync>;

/// The raw slot map, exposed to [`ResourceDistributor::with_lock`].
pub type ResourceMap = HashMap<ResourceKey, SharedResource>;

#[derive(Default)]
pub struct ResourceDistributor {
    resources: RwLock<ResourceMap>,
}

impl ResourceDistributor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the resource stored for `tenant` under `resource_id`.
    ///
    /// # Errors
    /// `TenantOrAppNotFound` when the slot is empty, `TypeMismatch` when it
    /// holds a value of another type.
    pub fn get_resource<T>(
        &self,
        tenant: &TenantIdentifier,
        resource_id: &str,
    ) -> Result<Arc<T>, ResourceError>
    where
        T: Any + Send + Sync,
    {
        let resource = self
            .resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ResourceKey::new(tenant, resource_id))
            .cloned()
            .ok_or_else(|| ResourceError::TenantOrAppNotFound(tenant.clone()))?;

        resource
            .downcast::<T>()
            .map_err(|_| ResourceError::TypeMismatch {
                resource_id: resource_id.to_string(),
            })
    }

    /// Stores `resource`, replacing any previous value. Returns true if a
    /// value was replaced.
    pub fn set_resource<T>(
        &self,
        tenant: &TenantIdentifier,
        resource_id: &str,
        resource: Arc<T>,
    ) -> bool
    where
        T: Any + Send + Sync,
    {
        let previous = self
            .resources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ResourceKey::new(tenant, resource_id), resource);

        debug!(tenant = %tenant, resource_id, replaced = previous.is_some(), "Resource stored");
        previous.is_some()
    }

    /// Removes one slot. Returns true if it was occupied.
    pub fn remove_resource(&self, tenant: &TenantIdentifier, resource_id: &str) -> bool {
        self.resources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&ResourceKey::new(tenant, resource_id))
            .is_some()
    }

    /// Removes the slots of every tenant for `resource_id`. Returns how many were removed.
    pub fn clear_all_resources_with_resource_id(&self, resource_id: &str) -> usize {
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let before = resources.len();
        resources.retain(|key, _| key.resource_id != resource_id);
        before - resources.len()
    }

    /// Runs `f` while holding the write lock, for multi-step updates that
    /// must appear atomic to readers.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut ResourceMap) -> R) -> R {
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut resources)
    }

    pub fn len(&self) -> usize {
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResourceDistributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDistributor")
            .field("resources", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "counter";

    #[test]
    fn test_get_missing_is_not_found() {
        let distributor = ResourceDistributor::new();
        let err = distributor
            .get_resource::<u32>(&TenantIdentifier::BASE_TENANT, ID)
            .unwrap_err();
        assert_eq!(
            err,
            ResourceError::TenantOrAppNotFound(TenantIdentifier::BASE_TENANT)
        );
    }

    #[test]
    fn test_set_then_get_returns_same_arc() {
        let distributor = ResourceDistributor::new();
        let value = Arc::new(42_u32);
        assert!(!distributor.set_resource(&TenantIdentifier::BASE_TENANT, ID, Arc::clone(&value)));

        let fetched = distributor
            .get_resource::<u32>(&TenantIdentifier::BASE_TENANT, ID)
            .unwrap();
        assert!(Arc::ptr_eq(&value, &fetched));
    }

    #[test]
    fn test_set_replaces_previous() {
        let distributor = ResourceDistributor::new();
        distributor.set_resource(&TenantIdentifier::BASE_TENANT, ID, Arc::new(1_u32));
        assert!(distributor.set_resource(&TenantIdentifier::BASE_TENANT, ID, Arc::new(2_u32)));

        let fetched = distributor
            .get_resource::<u32>(&TenantIdentifier::BASE_TENANT, ID)
            .unwrap();
        assert_eq!(*fetched, 2);
        assert_eq!(distributor.len(), 1);
    }

    #[test]
    fn test_type_mismatch() {
        let distributor = ResourceDistributor::new();
        distributor.set_resource(&TenantIdentifier::BASE_TENANT, ID, Arc::new("text"));

        let err = distributor
            .get_resource::<u32>(&TenantIdentifier::BASE_TENANT, ID)
            .unwrap_err();
        assert!(matches!(err, ResourceError::TypeMismatch { resource_id } if resource_id == ID));
    }

    #[test]
    fn test_tenants_are_isolated() {
        let distributor = ResourceDistributor::new();
        let other = TenantIdentifier::new("", "app", "t1");
        distributor.set_resource(&TenantIdentifier::BASE_TENANT, ID, Arc::new(1_u32));

        assert!(distributor.get_resource::<u32>(&other, ID).is_err());
    }

    #[test]
    fn test_remove_and_clear() {
        let distributor = ResourceDistributor::new();
        let other = TenantIdentifier::new("", "app", "t1");
        distributor.set_resource(&TenantIdentifier::BASE_TENANT, ID, Arc::new(1_u32));
        distributor.set_resource(&other, ID, Arc::new(2_u32));
        distributor.set_resource(&other, "other", Arc::new(3_u32));

        assert!(distributor.remove_resource(&other, "other"));
        assert!(!distributor.remove_resource(&other, "other"));
        assert_eq!(distributor.clear_all_resources_with_resource_id(ID), 2);
        assert!(distributor.is_empty());
    }

    #[test]
    fn test_with_lock_is_atomic_multi_step() {
        let distributor = ResourceDistributor::new();
        let inserted = distributor.with_lock(|resources| {
            let key = ResourceKey::new(&TenantIdentifier::BASE_TENANT, ID);
            if resources.contains_key(&key) {
                return false;
            }
            resources.insert(key, Arc::new(7_u32));
            true
        });

        assert!(inserted);
        assert_eq!(distributor.len(), 1);
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", ResourceDistributor::new());
        assert!(debug_str.contains("ResourceDistributor"));
    }
}
