//! [`RecordPersistence`] trait definition.

use crate::error::DriverError;
use crate::records::GroupRecord;
use async_trait::async_trait;

/// Trait for persisting group records indexed by group uid.
///
/// Every call is one round trip to the backing store. Nothing is cached and
/// concurrent writers are not serialized: the last write wins.
#[async_trait]
pub trait RecordPersistence: Send + Sync {
    /// Store a new group record. Fails with `AlreadyExists` if one is stored.
    async fn create(&self, group: &GroupRecord) -> Result<(), DriverError>;

    /// Overwrite a stored group record. Fails with `NotFound` if none is stored.
    async fn update(&self, group: &GroupRecord) -> Result<(), DriverError>;

    /// Load a group record by uid. Fails with `NotFound` if none is stored.
    async fn get(&self, group_uid: &str) -> Result<GroupRecord, DriverError>;

    /// Delete a group record by uid. A repeated delete fails with `NotFound`.
    async fn delete(&self, group_uid: &str) -> Result<(), DriverError>;
}
