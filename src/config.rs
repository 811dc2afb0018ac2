//! Driver configuration.
//!
//! Configuration is an explicit struct handed to constructors. It is loaded
//! from YAML files, layered in order, with an optional final file named by
//! the `KUBEDRIVER_CONFIG` environment variable.

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an extra configuration file.
pub const CONFIG_ENV_VAR: &str = "KUBEDRIVER_CONFIG";

pub const DEFAULT_NAMESPACE: &str = "default";

/// Top-level driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Namespace used by the object client when neither the object nor the
    /// call names one.
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Where and how group records are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Namespace holding every record document.
    #[serde(default = "default_namespace")]
    pub storage_namespace: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    /// Top-level field of the storage object that holds the encoded record.
    #[serde(default = "default_data_field")]
    pub data_field: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_kind() -> String {
    "ConfigMap".to_string()
}

fn default_data_field() -> String {
    "data".to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_namespace: default_namespace(),
            api_version: default_api_version(),
            kind: default_kind(),
            data_field: default_data_field(),
        }
    }
}

impl PersistenceConfig {
    pub fn with_storage_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self
    }
}

impl DriverConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, DriverError> {
        serde_yaml::from_str(content)
            .map_err(|e| DriverError::Config(format!("failed to parse config: {}", e)))
    }

    /// Load a single required file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DriverError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Merge optional files in order, later keys winning, then the file named
    /// by [`CONFIG_ENV_VAR`] if it is set. Files that do not exist are skipped.
    pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DriverError> {
        let extra = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::load_layered_with_env(paths, extra)
    }

    /// [`DriverConfig::load_layered`] with the environment file passed in
    /// rather than read from [`CONFIG_ENV_VAR`].
    pub fn load_layered_with_env<P: AsRef<Path>>(
        paths: &[P],
        extra: Option<PathBuf>,
    ) -> Result<Self, DriverError> {
        let mut candidates: Vec<PathBuf> =
            paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        candidates.extend(extra);

        let mut merged = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
        for path in &candidates {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "optional config file absent");
                    continue;
                }
                Err(e) => {
                    return Err(DriverError::Config(format!(
                        "failed to read {}: {}",
                        path.display(),
                        e
                    )))
                }
            };
            let layer: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|e| {
                DriverError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?;
            merge_yaml(&mut merged, layer);
            tracing::debug!(path = %path.display(), "loaded config layer");
        }

        serde_yaml::from_value(merged)
            .map_err(|e| DriverError::Config(format!("invalid config: {}", e)))
    }
}

fn merge_yaml(base: &mut serde_yaml::Value, layer: serde_yaml::Value) {
    match (base, layer) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        // an empty file parses to null and contributes nothing
        (_, serde_yaml::Value::Null) => {}
        (base, layer) => *base = layer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "kubedriver-config-{}-{}.yml",
            tag,
            uuid::Uuid::new_v4()
        ))
    }

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.persistence.storage_namespace, "default");
        assert_eq!(config.persistence.api_version, "v1");
        assert_eq!(config.persistence.kind, "ConfigMap");
        assert_eq!(config.persistence.data_field, "data");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = DriverConfig::from_yaml_str(
            "persistence:\n  storage_namespace: kubedriver\n",
        )
        .unwrap();
        assert_eq!(config.persistence.storage_namespace, "kubedriver");
        assert_eq!(config.persistence.kind, "ConfigMap");
        assert_eq!(config.default_namespace, "default");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = DriverConfig::from_yaml_str("persistence: [unclosed").unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
    }

    #[test]
    fn test_layered_later_files_win() {
        let base = temp_path("base");
        let over = temp_path("over");
        std::fs::write(
            &base,
            "default_namespace: apps\npersistence:\n  storage_namespace: records\n  kind: ConfigMap\n",
        )
        .unwrap();
        std::fs::write(&over, "persistence:\n  storage_namespace: driver-records\n").unwrap();
        let missing = temp_path("missing");

        let config =
            DriverConfig::load_layered_with_env(&[&base, &missing, &over], None).unwrap();
        assert_eq!(config.default_namespace, "apps");
        assert_eq!(config.persistence.storage_namespace, "driver-records");
        assert_eq!(config.persistence.kind, "ConfigMap");

        let _ = std::fs::remove_file(base);
        let _ = std::fs::remove_file(over);
    }

    #[test]
    fn test_env_file_applied_last() {
        let base = temp_path("base");
        let env = temp_path("env");
        std::fs::write(
            &base,
            "default_namespace: apps\npersistence:\n  storage_namespace: records\n",
        )
        .unwrap();
        std::fs::write(&env, "persistence:\n  storage_namespace: from-env\n").unwrap();

        let config = DriverConfig::load_layered_with_env(&[&base], Some(env.clone())).unwrap();
        assert_eq!(config.default_namespace, "apps");
        assert_eq!(config.persistence.storage_namespace, "from-env");

        // a named env file that does not exist is skipped like any other layer
        let config =
            DriverConfig::load_layered_with_env(&[&base], Some(temp_path("absent"))).unwrap();
        assert_eq!(config.persistence.storage_namespace, "records");

        let _ = std::fs::remove_file(base);
        let _ = std::fs::remove_file(env);
    }

    #[test]
    fn test_load_missing_required_file() {
        let err = DriverConfig::load(temp_path("absent")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
