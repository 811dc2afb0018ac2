//! Persistence layer for group records.
//!
//! This module contains:
//! - [`format`]: group records to and from a flat string document
//! - [`RecordPersistence`] trait + [`ConfigMapRecordPersistence`]: one
//!   storage object per group, addressed by the group uid

pub mod config_map;
pub mod format;
mod store;

pub use config_map::{ConfigMapRecordPersistence, NameSanitizer, RECORD_NAME_PREFIX};
pub use format::{decode_group, encode_group, StorageDocument};
pub use store::RecordPersistence;

#[cfg(test)]
mod tests;
