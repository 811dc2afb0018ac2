//! Lifecycle state tags for object and request records.
//!
//! Records carry their state as a plain string so that the storage layer
//! round-trips tags it does not know about. These constants are the set the
//! driver itself writes.

/// States of a single managed object.
pub struct ObjectStates;

impl ObjectStates {
    pub const CREATE_REQUESTED: &'static str = "CREATE_REQUESTED";
    pub const CREATED: &'static str = "CREATED";
    pub const CREATE_FAILED: &'static str = "CREATE_FAILED";
    pub const UPDATE_REQUESTED: &'static str = "UPDATE_REQUESTED";
    pub const UPDATED: &'static str = "UPDATED";
    pub const UPDATE_FAILED: &'static str = "UPDATE_FAILED";
    pub const DELETE_REQUESTED: &'static str = "DELETE_REQUESTED";
    pub const DELETED: &'static str = "DELETED";
    pub const DELETE_FAILED: &'static str = "DELETE_FAILED";

    pub const ALL: [&'static str; 9] = [
        Self::CREATE_REQUESTED,
        Self::CREATED,
        Self::CREATE_FAILED,
        Self::UPDATE_REQUESTED,
        Self::UPDATED,
        Self::UPDATE_FAILED,
        Self::DELETE_REQUESTED,
        Self::DELETED,
        Self::DELETE_FAILED,
    ];

    pub fn is_failure(state: &str) -> bool {
        matches!(
            state,
            ObjectStates::CREATE_FAILED
                | ObjectStates::UPDATE_FAILED
                | ObjectStates::DELETE_FAILED
        )
    }

    /// A requested state is still waiting on the cluster.
    pub fn is_pending(state: &str) -> bool {
        matches!(
            state,
            ObjectStates::CREATE_REQUESTED
                | ObjectStates::UPDATE_REQUESTED
                | ObjectStates::DELETE_REQUESTED
        )
    }
}

/// States of a request made against a group.
pub struct RequestStates;

impl RequestStates {
    pub const IN_PROGRESS: &'static str = "IN_PROGRESS";
    pub const COMPLETE: &'static str = "COMPLETE";
    pub const FAILED: &'static str = "FAILED";

    pub fn is_failure(state: &str) -> bool {
        state == RequestStates::FAILED
    }

    pub fn is_terminal(state: &str) -> bool {
        matches!(state, RequestStates::COMPLETE | RequestStates::FAILED)
    }
}
