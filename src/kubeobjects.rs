//! Object definitions as submitted to the cluster.
//!
//! An [`ObjectConfiguration`] is a loosely typed JSON document with the usual
//! `apiVersion` / `kind` / `metadata` envelope. The driver never interprets
//! `spec` or any other body field; it only needs the envelope to address
//! the object.

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single object definition.
///
/// Deserialization is permissive so that stored records round-trip even
/// when the envelope is incomplete; [`ObjectConfiguration::new`] is the
/// validating constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectConfiguration(Value);

impl ObjectConfiguration {
    pub const API_VERSION: &'static str = "apiVersion";
    pub const KIND: &'static str = "kind";
    pub const METADATA: &'static str = "metadata";
    pub const NAME: &'static str = "name";
    pub const NAMESPACE: &'static str = "namespace";

    /// Wrap a JSON document, requiring `apiVersion`, `kind` and `metadata.name`.
    pub fn new(value: Value) -> Result<Self, DriverError> {
        let config = Self(value);
        if !config.0.is_object() {
            return Err(DriverError::InvalidObject(
                "object definition must be a mapping".into(),
            ));
        }
        config.identity()?;
        Ok(config)
    }

    /// Build a definition from its envelope plus any top-level body fields.
    pub fn build(
        api_version: &str,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
        body: Map<String, Value>,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert(Self::NAME.into(), Value::String(name.into()));
        if let Some(ns) = namespace {
            metadata.insert(Self::NAMESPACE.into(), Value::String(ns.into()));
        }

        let mut root = Map::new();
        root.insert(Self::API_VERSION.into(), Value::String(api_version.into()));
        root.insert(Self::KIND.into(), Value::String(kind.into()));
        root.insert(Self::METADATA.into(), Value::Object(metadata));
        for (key, value) in body {
            root.insert(key, value);
        }
        Self(Value::Object(root))
    }

    pub fn api_version(&self) -> Option<&str> {
        self.0.get(Self::API_VERSION).and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get(Self::KIND).and_then(Value::as_str)
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.0.get(Self::METADATA).and_then(Value::as_object)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get(Self::NAME))
            .and_then(Value::as_str)
    }

    /// The namespace declared in the definition itself, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get(Self::NAMESPACE))
            .and_then(Value::as_str)
    }

    /// A top-level body field such as `spec` or `data`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `(apiVersion, kind, name)`, or an error naming the first missing part.
    pub fn identity(&self) -> Result<(&str, &str, &str), DriverError> {
        let api_version = self
            .api_version()
            .ok_or_else(|| DriverError::InvalidObject("missing apiVersion".into()))?;
        let kind = self
            .kind()
            .ok_or_else(|| DriverError::InvalidObject("missing kind".into()))?;
        let name = self
            .name()
            .ok_or_else(|| DriverError::InvalidObject("missing metadata.name".into()))?;
        Ok((api_version, kind, name))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<ObjectConfiguration> for Value {
    fn from(config: ObjectConfiguration) -> Self {
        config.0
    }
}

impl fmt::Display for ObjectConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.kind().unwrap_or("<no kind>"),
            self.name().unwrap_or("<no name>")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_requires_envelope() {
        let ok = ObjectConfiguration::new(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "web", "namespace": "apps"},
            "spec": {"ports": [{"port": 80}]}
        }))
        .unwrap();
        assert_eq!(ok.api_version(), Some("v1"));
        assert_eq!(ok.kind(), Some("Service"));
        assert_eq!(ok.name(), Some("web"));
        assert_eq!(ok.namespace(), Some("apps"));
        assert_eq!(ok.to_string(), "Service/web");

        let err = ObjectConfiguration::new(json!({"apiVersion": "v1", "kind": "Service"}))
            .unwrap_err();
        assert!(err.to_string().contains("metadata.name"));

        let err = ObjectConfiguration::new(json!(["not", "a", "mapping"])).unwrap_err();
        assert!(matches!(err, DriverError::InvalidObject(_)));
    }

    #[test]
    fn test_build_places_body_fields_at_top_level() {
        let mut body = Map::new();
        body.insert("data".into(), json!({"uid": "grp-1"}));
        let config = ObjectConfiguration::build("v1", "ConfigMap", "kdr-grp-1", Some("infra"), body);

        assert_eq!(config.identity().unwrap(), ("v1", "ConfigMap", "kdr-grp-1"));
        assert_eq!(config.namespace(), Some("infra"));
        assert_eq!(config.field("data"), Some(&json!({"uid": "grp-1"})));
    }

    #[test]
    fn test_permissive_deserialize() {
        let config: ObjectConfiguration = serde_json::from_value(json!({"kind": "Pod"})).unwrap();
        assert_eq!(config.kind(), Some("Pod"));
        assert!(config.name().is_none());
        assert!(config.identity().is_err());
    }
}
