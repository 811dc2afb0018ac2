//! [`ObjectRecord`]: one managed object inside a group.

use crate::kubeobjects::ObjectConfiguration;
use crate::records::states::ObjectStates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The last submitted definition of an object plus its lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub config: ObjectConfiguration,
    pub state: String,
    /// Failure detail. Absent and empty are different values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ObjectRecord {
    pub fn new(config: ObjectConfiguration, state: impl Into<String>) -> Self {
        Self {
            config,
            state: state.into(),
            error: None,
        }
    }

    /// A record for an object the driver is about to create.
    pub fn create_requested(config: ObjectConfiguration) -> Self {
        Self::new(config, ObjectStates::CREATE_REQUESTED)
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Move to a new state, clearing any previous error.
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
        self.error = None;
    }

    pub fn fail(&mut self, state: impl Into<String>, error: impl Into<String>) {
        self.state = state.into();
        self.error = Some(error.into());
    }

    pub fn is_failed(&self) -> bool {
        ObjectStates::is_failure(&self.state)
    }

    /// Whether this record describes the object with the given coordinates.
    pub fn matches(&self, api_version: &str, kind: &str, name: &str) -> bool {
        self.config.api_version() == Some(api_version)
            && self.config.kind() == Some(kind)
            && self.config.name() == Some(name)
    }
}

impl fmt::Display for ObjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRecord(config: {}, state: {}", self.config, self.state)?;
        if let Some(error) = &self.error {
            write!(f, ", error: {}", error)?;
        }
        write!(f, ")")
    }
}
