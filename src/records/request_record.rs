//! [`RequestRecord`]: one externally initiated operation against a group.

use crate::records::states::RequestStates;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub uid: String,
    pub operation: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestRecord {
    /// A freshly accepted request, `IN_PROGRESS`.
    pub fn new(uid: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            operation: operation.into(),
            state: RequestStates::IN_PROGRESS.to_string(),
            error: None,
        }
    }

    /// Same as [`RequestRecord::new`] with a random v4 uid.
    pub fn generate(operation: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), operation)
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn complete(&mut self) {
        self.state = RequestStates::COMPLETE.to_string();
        self.error = None;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = RequestStates::FAILED.to_string();
        self.error = Some(error.into());
    }

    pub fn is_terminal(&self) -> bool {
        RequestStates::is_terminal(&self.state)
    }
}

impl fmt::Display for RequestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RequestRecord(uid: {}, operation: {}, state: {}",
            self.uid, self.operation, self.state
        )?;
        if let Some(error) = &self.error {
            write!(f, ", error: {}", error)?;
        }
        write!(f, ")")
    }
}
