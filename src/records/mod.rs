//! In-memory record model: groups, their objects and their requests.
//!
//! These are plain value types. Persistence lives in [`crate::store`].

mod group_record;
mod object_record;
mod request_record;
mod states;

pub use group_record::GroupRecord;
pub use object_record::ObjectRecord;
pub use request_record::RequestRecord;
pub use states::{ObjectStates, RequestStates};
