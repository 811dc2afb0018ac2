//! Kube Driver Records
//!
//! Group record model and cluster-native persistence for a Kubernetes
//! deployment driver.
//!
//! # Design
//!
//! A [`GroupRecord`] is the full state of one logical deployment: the
//! objects it manages and the requests made against it. The record layer
//! turns a group into a flat string document ([`store::format`]) and keeps
//! it in a single ConfigMap per group ([`ConfigMapRecordPersistence`]). It
//! never talks to the cluster directly; you provide a [`KubeApiController`]
//! and it does one round trip per operation. Deciding when to create,
//! update or delete objects is the orchestrator's job.
//!
//! # Usage
//!
//! ```ignore
//! use kubedriver::{
//!     ConfigMapRecordPersistence, DriverConfig, GroupRecord, RecordPersistence, RequestRecord,
//! };
//!
//! let config = DriverConfig::load_layered(&["./kubedriver_config.yml"])?;
//! let client = std::sync::Arc::new(MyKubeClient::new(&config));
//! let records = ConfigMapRecordPersistence::new(client, config.persistence.clone());
//!
//! let mut group = GroupRecord::new("grp-1");
//! group.add_request(RequestRecord::new("req-1", "Deploy"))?;
//! records.create(&group).await?;
//!
//! // later, possibly after a restart
//! let group = records.get("grp-1").await?;
//! ```

pub mod config;
pub mod error;
pub mod kubeclient;
pub mod kubeobjects;
pub mod names;
pub mod records;
pub mod store;

// Re-export the main types at crate root for convenience
pub use config::{DriverConfig, PersistenceConfig};
pub use error::DriverError;
pub use kubeclient::{resolve_namespace, KubeApiController};
pub use kubeobjects::ObjectConfiguration;
pub use names::safe_subdomain_name;
pub use records::{GroupRecord, ObjectRecord, ObjectStates, RequestRecord, RequestStates};
pub use store::{ConfigMapRecordPersistence, RecordPersistence, StorageDocument};

#[cfg(feature = "memory-client")]
pub use kubeclient::MemoryApiController;
