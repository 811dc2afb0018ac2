//! Error types for the kube driver record layer.
//!
//! No `anyhow` leakage. Explicit, typed errors. Every failure from the
//! storage format or the object client reaches the caller unchanged.

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{kind} {name} not found in namespace {namespace}")]
    NotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    #[error("{kind} {name} already exists in namespace {namespace}")]
    AlreadyExists {
        kind: String,
        name: String,
        namespace: String,
    },

    #[error("failed to decode {field}: {message}")]
    Decode { field: String, message: String },

    #[error("failed to encode {field}: {message}")]
    Encode { field: String, message: String },

    #[error("connection to cluster failed: {0}")]
    Connection(String),

    #[error("invalid object configuration: {0}")]
    InvalidObject(String),

    #[error("request {request} already recorded on group {group}")]
    DuplicateRequest { group: String, request: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DriverError {
    pub(crate) fn decode(field: impl Into<String>, message: impl ToString) -> Self {
        DriverError::Decode {
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn encode(field: impl Into<String>, message: impl ToString) -> Self {
        DriverError::Encode {
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, DriverError::AlreadyExists { .. })
    }

    /// Whether this error might be recoverable by retry.
    ///
    /// Nothing in this crate retries; the flag is for the orchestration layer.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DriverError::Connection(_))
    }
}
