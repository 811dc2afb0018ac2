//! ConfigMap-backed group record store.
//!
//! Stores each group record as one ConfigMap named
//! `safe_subdomain_name("kdr-" + uid)` in the configured storage namespace.
//! The object type, version and data field are configurable.

use crate::config::PersistenceConfig;
use crate::error::DriverError;
use crate::kubeclient::KubeApiController;
use crate::kubeobjects::ObjectConfiguration;
use crate::names::safe_subdomain_name;
use crate::records::GroupRecord;
use crate::store::format::{decode_group, encode_group, StorageDocument};
use crate::store::RecordPersistence;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Prefix of every storage object name.
pub const RECORD_NAME_PREFIX: &str = "kdr-";

/// Turns a candidate name into one the storage backend accepts.
pub type NameSanitizer = fn(&str) -> String;

/// [`RecordPersistence`] over a generic [`KubeApiController`].
pub struct ConfigMapRecordPersistence<C: ?Sized> {
    client: Arc<C>,
    config: PersistenceConfig,
    sanitize: NameSanitizer,
}

impl<C: KubeApiController + ?Sized> ConfigMapRecordPersistence<C> {
    pub fn new(client: Arc<C>, config: PersistenceConfig) -> Self {
        Self {
            client,
            config,
            sanitize: safe_subdomain_name,
        }
    }

    /// Replace the default DNS-1123 sanitizer.
    pub fn with_name_sanitizer(mut self, sanitize: NameSanitizer) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Name of the storage object holding the record for `group_uid`.
    pub fn storage_name(&self, group_uid: &str) -> String {
        (self.sanitize)(&format!("{}{}", RECORD_NAME_PREFIX, group_uid))
    }

    /// Whether a record is stored for `group_uid`.
    pub async fn exists(&self, group_uid: &str) -> Result<bool, DriverError> {
        let name = self.storage_name(group_uid);
        let found = self
            .client
            .safe_read_object(
                &self.config.api_version,
                &self.config.kind,
                &name,
                Some(self.config.storage_namespace.as_str()),
            )
            .await?;
        Ok(found.is_some())
    }

    fn build_storage_object(
        &self,
        group: &GroupRecord,
    ) -> Result<ObjectConfiguration, DriverError> {
        let document = encode_group(group)?;
        let data: Map<String, Value> = document
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        let mut body = Map::new();
        body.insert(self.config.data_field.clone(), Value::Object(data));

        Ok(ObjectConfiguration::build(
            &self.config.api_version,
            &self.config.kind,
            &self.storage_name(group.uid()),
            Some(self.config.storage_namespace.as_str()),
            body,
        ))
    }

    fn read_storage_object(
        &self,
        object: &ObjectConfiguration,
    ) -> Result<GroupRecord, DriverError> {
        let field = self.config.data_field.as_str();
        let mut document = StorageDocument::new();
        match object.field(field) {
            None | Some(Value::Null) => {}
            Some(Value::Object(data)) => {
                for (key, value) in data {
                    let value = value.as_str().ok_or_else(|| {
                        DriverError::decode(key.as_str(), "stored value is not a string")
                    })?;
                    document.insert(key.clone(), value.to_string());
                }
            }
            Some(_) => {
                return Err(DriverError::decode(field, "data field is not a mapping"));
            }
        }
        decode_group(&document)
    }
}

#[async_trait]
impl<C: KubeApiController + ?Sized> RecordPersistence for ConfigMapRecordPersistence<C> {
    async fn create(&self, group: &GroupRecord) -> Result<(), DriverError> {
        let object = self.build_storage_object(group)?;
        tracing::debug!(
            group = group.uid(),
            name = object.name().unwrap_or_default(),
            namespace = %self.config.storage_namespace,
            "creating group record"
        );
        self.client
            .create_object(&object, Some(self.config.storage_namespace.as_str()))
            .await?;
        Ok(())
    }

    async fn update(&self, group: &GroupRecord) -> Result<(), DriverError> {
        let object = self.build_storage_object(group)?;
        tracing::debug!(
            group = group.uid(),
            name = object.name().unwrap_or_default(),
            namespace = %self.config.storage_namespace,
            "updating group record"
        );
        self.client
            .update_object(&object, Some(self.config.storage_namespace.as_str()))
            .await?;
        Ok(())
    }

    async fn get(&self, group_uid: &str) -> Result<GroupRecord, DriverError> {
        let name = self.storage_name(group_uid);
        tracing::debug!(
            group = group_uid,
            name = %name,
            namespace = %self.config.storage_namespace,
            "reading group record"
        );
        let object = self
            .client
            .read_object(
                &self.config.api_version,
                &self.config.kind,
                &name,
                Some(self.config.storage_namespace.as_str()),
            )
            .await?;

        self.read_storage_object(&object).map_err(|e| {
            tracing::warn!(
                group = group_uid,
                name = %name,
                error = %e,
                "stored group record is unreadable"
            );
            e
        })
    }

    async fn delete(&self, group_uid: &str) -> Result<(), DriverError> {
        let name = self.storage_name(group_uid);
        tracing::debug!(
            group = group_uid,
            name = %name,
            namespace = %self.config.storage_namespace,
            "deleting group record"
        );
        self.client
            .delete_object(
                &self.config.api_version,
                &self.config.kind,
                &name,
                Some(self.config.storage_namespace.as_str()),
            )
            .await
    }
}

#[cfg(all(test, feature = "memory-client"))]
mod tests {
    use super::*;
    use crate::kubeclient::MemoryApiController;
    use crate::records::{ObjectRecord, ObjectStates, RequestRecord, RequestStates};
    use serde_json::json;

    fn make_store() -> (
        Arc<MemoryApiController>,
        ConfigMapRecordPersistence<MemoryApiController>,
    ) {
        let client = Arc::new(MemoryApiController::new());
        let config = PersistenceConfig::default().with_storage_namespace("driver-records");
        let store = ConfigMapRecordPersistence::new(client.clone(), config);
        (client, store)
    }

    fn make_group(uid: &str) -> GroupRecord {
        let config = ObjectConfiguration::new(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "web", "namespace": "apps"},
            "spec": {"ports": [{"port": 80, "targetPort": 8080}]}
        }))
        .unwrap();
        let mut group = GroupRecord::new(uid);
        group.add_object(ObjectRecord::create_requested(config));
        group.add_request(RequestRecord::new("req-1", "Deploy")).unwrap();
        group
    }

    #[tokio::test]
    async fn test_storage_object_layout() {
        let (client, store) = make_store();
        store.create(&make_group("grp-1")).await.unwrap();

        let stored = client
            .read_object("v1", "ConfigMap", "kdr-grp-1", Some("driver-records"))
            .await
            .unwrap();
        assert_eq!(stored.namespace(), Some("driver-records"));

        let data = stored.field("data").unwrap().as_object().unwrap();
        assert_eq!(data["uid"], json!("grp-1"));
        assert!(data["objects"].is_string());
        assert!(data["requests"].is_string());
        assert_eq!(data.len(), 3);
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let (client, store) = make_store();
        let mut group = make_group("grp-1");

        store.create(&group).await.unwrap();
        assert!(store.exists("grp-1").await.unwrap());
        assert_eq!(store.get("grp-1").await.unwrap(), group);

        group.objects_mut()[0].set_state(ObjectStates::CREATED);
        group.request_mut("req-1").unwrap().complete();
        store.update(&group).await.unwrap();

        let loaded = store.get("grp-1").await.unwrap();
        assert_eq!(loaded.objects()[0].state, ObjectStates::CREATED);
        assert_eq!(loaded.requests()[0].state, RequestStates::COMPLETE);

        store.delete("grp-1").await.unwrap();
        assert!(!store.exists("grp-1").await.unwrap());
        assert_eq!(client.object_count().await, 0);
    }

    #[tokio::test]
    async fn test_custom_kind_and_data_field() {
        let client = Arc::new(MemoryApiController::new());
        let config = PersistenceConfig {
            storage_namespace: "records".to_string(),
            api_version: "example.com/v1".to_string(),
            kind: "RecordStore".to_string(),
            data_field: "entries".to_string(),
        };
        let store = ConfigMapRecordPersistence::new(client.clone(), config);
        let group = make_group("grp-2");
        store.create(&group).await.unwrap();

        let stored = client
            .read_object("example.com/v1", "RecordStore", "kdr-grp-2", Some("records"))
            .await
            .unwrap();
        assert!(stored.field("entries").is_some());
        assert!(stored.field("data").is_none());
        assert_eq!(store.get("grp-2").await.unwrap(), group);
    }

    #[test]
    fn test_custom_sanitizer() {
        fn upper(candidate: &str) -> String {
            candidate.to_uppercase()
        }
        let (_client, store) = make_store();
        let store = store.with_name_sanitizer(upper);
        assert_eq!(store.storage_name("grp-1"), "KDR-GRP-1");
    }

    #[tokio::test]
    async fn test_non_string_data_value_fails_decode() {
        let (client, store) = make_store();
        let broken = ObjectConfiguration::new(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {"name": "kdr-grp-9", "namespace": "driver-records"},
            "data": {"uid": "grp-9", "objects": 42}
        }))
        .unwrap();
        client.create_object(&broken, None).await.unwrap();

        match store.get("grp-9").await.unwrap_err() {
            DriverError::Decode { field, .. } => assert_eq!(field, "objects"),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let client: Arc<dyn KubeApiController> = Arc::new(MemoryApiController::new());
        let store: Box<dyn RecordPersistence> = Box::new(ConfigMapRecordPersistence::new(
            client,
            PersistenceConfig::default(),
        ));
        let group = make_group("grp-dyn");
        store.create(&group).await.unwrap();
        assert_eq!(store.get("grp-dyn").await.unwrap(), group);
    }
}
