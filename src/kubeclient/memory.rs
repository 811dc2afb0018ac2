use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::DEFAULT_NAMESPACE;
use crate::error::DriverError;
use crate::kubeclient::{resolve_namespace, KubeApiController};
use crate::kubeobjects::ObjectConfiguration;

/// Kinds stored without a namespace.
const CLUSTER_SCOPED_KINDS: &[&str] = &[
    "Namespace",
    "Node",
    "PersistentVolume",
    "StorageClass",
    "ClusterRole",
    "ClusterRoleBinding",
    "CustomResourceDefinition",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ObjectKey {
    api_version: String,
    kind: String,
    // empty for cluster-scoped kinds
    namespace: String,
    name: String,
}

/// In-memory [`KubeApiController`] backed by a `HashMap`.
///
/// Intended for tests and local runs; nothing survives the process. Cloning
/// shares the same object map. [`MemoryApiController::set_offline`] makes
/// every call fail with [`DriverError::Connection`].
#[derive(Clone)]
pub struct MemoryApiController {
    objects: Arc<RwLock<HashMap<ObjectKey, ObjectConfiguration>>>,
    cluster_scoped: Arc<HashSet<String>>,
    default_namespace: String,
    offline: Arc<AtomicBool>,
}

impl MemoryApiController {
    pub fn new() -> Self {
        Self::with_default_namespace(DEFAULT_NAMESPACE)
    }

    pub fn with_default_namespace(default_namespace: impl Into<String>) -> Self {
        MemoryApiController {
            objects: Arc::new(RwLock::new(HashMap::new())),
            cluster_scoped: Arc::new(
                CLUSTER_SCOPED_KINDS.iter().map(|k| k.to_string()).collect(),
            ),
            default_namespace: default_namespace.into(),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored objects across all namespaces.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    fn check_online(&self) -> Result<(), DriverError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DriverError::Connection("cluster unreachable".into()));
        }
        Ok(())
    }

    fn namespaced(&self, kind: &str) -> bool {
        !self.cluster_scoped.contains(kind)
    }

    fn key(&self, api_version: &str, kind: &str, name: &str, namespace: &str) -> ObjectKey {
        ObjectKey {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            namespace: if self.namespaced(kind) {
                namespace.to_string()
            } else {
                String::new()
            },
            name: name.to_string(),
        }
    }

    /// Key plus the stored form of a submitted object.
    fn prepare(
        &self,
        object: &ObjectConfiguration,
        default_namespace: Option<&str>,
    ) -> Result<(ObjectKey, ObjectConfiguration), DriverError> {
        let (api_version, kind, name) = object.identity()?;
        let namespace = resolve_namespace(object, default_namespace, &self.default_namespace);
        let key = self.key(api_version, kind, name, namespace);

        let mut value = object.as_value().clone();
        if self.namespaced(kind) {
            if let Some(metadata) = value
                .get_mut(ObjectConfiguration::METADATA)
                .and_then(Value::as_object_mut)
            {
                metadata.insert(
                    ObjectConfiguration::NAMESPACE.to_string(),
                    Value::String(key.namespace.clone()),
                );
            }
        }
        Ok((key, ObjectConfiguration::new(value)?))
    }
}

impl Default for MemoryApiController {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(key: &ObjectKey) -> DriverError {
    DriverError::NotFound {
        kind: key.kind.clone(),
        name: key.name.clone(),
        namespace: key.namespace.clone(),
    }
}

#[async_trait]
impl KubeApiController for MemoryApiController {
    async fn create_object(
        &self,
        object: &ObjectConfiguration,
        default_namespace: Option<&str>,
    ) -> Result<ObjectConfiguration, DriverError> {
        self.check_online()?;
        let (key, stored) = self.prepare(object, default_namespace)?;
        let mut g = self.objects.write().await;
        if g.contains_key(&key) {
            return Err(DriverError::AlreadyExists {
                kind: key.kind,
                name: key.name,
                namespace: key.namespace,
            });
        }
        g.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update_object(
        &self,
        object: &ObjectConfiguration,
        default_namespace: Option<&str>,
    ) -> Result<ObjectConfiguration, DriverError> {
        self.check_online()?;
        let (key, stored) = self.prepare(object, default_namespace)?;
        let mut g = self.objects.write().await;
        match g.get_mut(&key) {
            Some(existing) => {
                *existing = stored.clone();
                Ok(stored)
            }
            None => Err(not_found(&key)),
        }
    }

    async fn read_object(
        &self,
        api_version: &str,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<ObjectConfiguration, DriverError> {
        self.check_online()?;
        let key = self.key(
            api_version,
            kind,
            name,
            namespace.unwrap_or(&self.default_namespace),
        );
        self.objects
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| not_found(&key))
    }

    async fn delete_object(
        &self,
        api_version: &str,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), DriverError> {
        self.check_online()?;
        let key = self.key(
            api_version,
            kind,
            name,
            namespace.unwrap_or(&self.default_namespace),
        );
        match self.objects.write().await.remove(&key) {
            Some(_) => Ok(()),
            None => Err(not_found(&key)),
        }
    }

    async fn is_object_namespaced(
        &self,
        _api_version: &str,
        kind: &str,
    ) -> Result<bool, DriverError> {
        self.check_online()?;
        Ok(self.namespaced(kind))
    }
}
