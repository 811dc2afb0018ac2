//! [`GroupRecord`]: the unit of persistence.
//!
//! A group is the full state of one logical deployment: the objects it
//! manages and the history of requests made against it. The uid is fixed
//! at construction and request uids are unique within the group.

use crate::error::DriverError;
use crate::records::{ObjectRecord, RequestRecord};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    uid: String,
    objects: Vec<ObjectRecord>,
    requests: Vec<RequestRecord>,
}

impl GroupRecord {
    /// An empty group.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            objects: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Assemble a group from existing records, rejecting duplicate request uids.
    pub fn from_parts(
        uid: impl Into<String>,
        objects: Vec<ObjectRecord>,
        requests: Vec<RequestRecord>,
    ) -> Result<Self, DriverError> {
        let mut group = Self {
            uid: uid.into(),
            objects,
            requests: Vec::with_capacity(requests.len()),
        };
        for request in requests {
            group.add_request(request)?;
        }
        Ok(group)
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn objects(&self) -> &[ObjectRecord] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut Vec<ObjectRecord> {
        &mut self.objects
    }

    pub fn add_object(&mut self, object: ObjectRecord) {
        self.objects.push(object);
    }

    /// Drop the record of an object confirmed deleted from the cluster.
    pub fn remove_object(
        &mut self,
        api_version: &str,
        kind: &str,
        name: &str,
    ) -> Option<ObjectRecord> {
        let index = self
            .objects
            .iter()
            .position(|o| o.matches(api_version, kind, name))?;
        Some(self.objects.remove(index))
    }

    /// Requests, oldest first.
    pub fn requests(&self) -> &[RequestRecord] {
        &self.requests
    }

    pub fn add_request(&mut self, request: RequestRecord) -> Result<(), DriverError> {
        if self.request(&request.uid).is_some() {
            return Err(DriverError::DuplicateRequest {
                group: self.uid.clone(),
                request: request.uid,
            });
        }
        self.requests.push(request);
        Ok(())
    }

    pub fn request(&self, request_uid: &str) -> Option<&RequestRecord> {
        self.requests.iter().find(|r| r.uid == request_uid)
    }

    /// Mutable access to one request. Changing the uid to one already in the
    /// group makes the group unstorable until it is changed back.
    pub fn request_mut(&mut self, request_uid: &str) -> Option<&mut RequestRecord> {
        self.requests.iter_mut().find(|r| r.uid == request_uid)
    }

    /// First request uid that appears more than once, if any.
    pub fn duplicate_request(&self) -> Option<&str> {
        self.requests
            .iter()
            .enumerate()
            .find(|(i, r)| self.requests[..*i].iter().any(|prev| prev.uid == r.uid))
            .map(|(_, r)| r.uid.as_str())
    }

    /// Remove every request for which `prune` returns true. Returns how many went.
    pub fn prune_requests<F>(&mut self, mut prune: F) -> usize
    where
        F: FnMut(&RequestRecord) -> bool,
    {
        let before = self.requests.len();
        self.requests.retain(|r| !prune(r));
        before - self.requests.len()
    }
}

impl fmt::Display for GroupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupRecord(uid: {}, objects: [", self.uid)?;
        for (i, object) in self.objects.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", object)?;
        }
        write!(f, "], requests: [")?;
        for (i, request) in self.requests.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", request)?;
        }
        write!(f, "])")
    }
}
