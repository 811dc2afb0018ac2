//! The generic object client boundary.
//!
//! The record layer never talks to the cluster directly. It goes through a
//! [`KubeApiController`], which creates, replaces, reads and deletes
//! arbitrary typed objects. Implement the trait over whatever transport
//! you use; [`MemoryApiController`] is an in-process implementation.

use crate::error::DriverError;
use crate::kubeobjects::ObjectConfiguration;
use async_trait::async_trait;

#[cfg(feature = "memory-client")]
mod memory;

#[cfg(feature = "memory-client")]
pub use memory::MemoryApiController;

/// CRUD over arbitrary cluster objects.
///
/// Implementations resolve the namespace of create and update calls with
/// [`resolve_namespace`]. Failures are reported as
/// [`DriverError::NotFound`], [`DriverError::AlreadyExists`] or
/// [`DriverError::Connection`] and are never retried here.
#[async_trait]
pub trait KubeApiController: Send + Sync {
    /// Create an object. Fails with `AlreadyExists` if it is already present.
    async fn create_object(
        &self,
        object: &ObjectConfiguration,
        default_namespace: Option<&str>,
    ) -> Result<ObjectConfiguration, DriverError>;

    /// Replace an existing object. Fails with `NotFound` if it is absent.
    async fn update_object(
        &self,
        object: &ObjectConfiguration,
        default_namespace: Option<&str>,
    ) -> Result<ObjectConfiguration, DriverError>;

    async fn read_object(
        &self,
        api_version: &str,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<ObjectConfiguration, DriverError>;

    /// Like [`KubeApiController::read_object`] but `NotFound` becomes `None`.
    async fn safe_read_object(
        &self,
        api_version: &str,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Option<ObjectConfiguration>, DriverError> {
        match self.read_object(api_version, kind, name, namespace).await {
            Ok(object) => Ok(Some(object)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_object(
        &self,
        api_version: &str,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), DriverError>;

    async fn is_object_namespaced(&self, api_version: &str, kind: &str)
        -> Result<bool, DriverError>;
}

/// Pick the namespace for a create or update.
///
/// The object's own `metadata.namespace` wins, then the namespace supplied
/// to the call, then the client's configured default.
pub fn resolve_namespace<'a>(
    object: &'a ObjectConfiguration,
    supplied_default: Option<&'a str>,
    configured_default: &'a str,
) -> &'a str {
    object
        .namespace()
        .or(supplied_default)
        .unwrap_or(configured_default)
}
